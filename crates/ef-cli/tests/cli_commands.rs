//! Integration tests for the `ef` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A catalog with a fixed character id and an opponent that always drops loot.
fn test_catalog() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("catalog.json"),
        r#"{
  "characters": [
    {
      "id": "00000000-0000-0000-0000-000000000001",
      "name": "Tamsin",
      "stats": { "strength": 10, "agility": 10, "intelligence": 10, "luck": 5 },
      "vitals": { "health": 60, "max_health": 60, "energy": 30, "max_energy": 30 },
      "attack": 12,
      "defense": 2
    }
  ],
  "opponents": [
    {
      "id": "dummy",
      "name": "Training Dummy",
      "health": 1,
      "attack": 0,
      "defense": 0,
      "experience_reward": 4,
      "loot": { "dummy_token": { "min": 2, "max": 2, "chance": 1.0 } }
    }
  ],
  "talents": [
    {
      "code": "first_blood",
      "name": "First Blood",
      "skill": "combat",
      "tier": 1,
      "threshold": 5,
      "effect": "damage_bonus",
      "magnitude": 1.0
    }
  ]
}
"#,
    )
    .unwrap();
    dir
}

fn catalog_path(dir: &TempDir) -> String {
    dir.path().join("catalog.json").to_str().unwrap().to_string()
}

fn ef() -> Command {
    let mut cmd = Command::cargo_bin("ef").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

// ---------------------------------------------------------------------------
// sample
// ---------------------------------------------------------------------------

#[test]
fn sample_prints_catalog_json() {
    let output = ef().arg("sample").output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["opponents"][0]["id"], "goblin");
    assert!(json["talents"].as_array().unwrap().len() >= 5);
}

#[test]
fn sample_writes_file_usable_by_fight() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.json");
    ef().args(["sample", "-o", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote sample catalog"));
    assert!(Path::new(&path).exists());

    ef().args(["fight", "goblin", "--catalog", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Kael")
                .and(predicate::str::contains("Goblin"))
                .and(predicate::str::contains("Victory!")),
        );
}

// ---------------------------------------------------------------------------
// fight
// ---------------------------------------------------------------------------

#[test]
fn fight_reports_rewards_and_loot() {
    let dir = test_catalog();
    ef().args(["fight", "dummy", "--catalog", &catalog_path(&dir)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Tamsin engages Training Dummy")
                .and(predicate::str::contains("Victory!"))
                .and(predicate::str::contains("Looted dummy_token x"))
                .and(predicate::str::contains("Experience"))
                .and(predicate::str::contains("mob_defeated")),
        );
}

#[test]
fn fight_is_reproducible_with_seed() {
    let dir = test_catalog();
    let path = catalog_path(&dir);
    let run = || {
        ef().args(["fight", "dummy", "--catalog", &path, "--seed", "7"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn fight_unlocks_talent() {
    let dir = test_catalog();
    ef().args(["fight", "dummy", "--catalog", &catalog_path(&dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Talent unlocked: First Blood."));
}

#[test]
fn fight_flee_tactic_escapes() {
    ef().args(["fight", "goblin", "--tactic", "flee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("got away"));
}

#[test]
fn fight_gives_up_after_max_rounds() {
    ef().args(["fight", "goblin", "--tactic", "defend", "--max-rounds", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no outcome after 3 rounds"));
}

#[test]
fn fight_history_markdown() {
    let dir = test_catalog();
    ef().args([
        "fight",
        "dummy",
        "--catalog",
        &catalog_path(&dir),
        "--history",
        "markdown",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("# Encounter History")
            .and(predicate::str::contains("| dummy | victory |")),
    );
}

#[test]
fn fight_rejects_unknown_history_format() {
    ef().args(["fight", "goblin", "--history", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown history format"));
}

#[test]
fn fight_fails_unknown_opponent() {
    ef().args(["fight", "dragon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("opponent not found"));
}

#[test]
fn fight_fails_unknown_character() {
    ef().args(["fight", "goblin", "--character", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("character not found"));
}

#[test]
fn fight_fails_invalid_tactic() {
    ef().args(["fight", "goblin", "--tactic", "attack,dance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action: dance"));
}

#[test]
fn fight_fails_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "xp_curve": { "base": 0.0 } }"#).unwrap();
    ef().args(["fight", "goblin", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load config"));
}

// ---------------------------------------------------------------------------
// talents
// ---------------------------------------------------------------------------

#[test]
fn talents_shows_unlocks_and_effects() {
    ef().args(["talents", "--skill", "combat", "--xp", "150"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Sharpened Blade")
                .and(predicate::str::contains("unlocked"))
                .and(predicate::str::contains("damage_bonus: 2"))
                .and(predicate::str::contains("loot_bonus_chance: 0.15")),
        );
}

#[test]
fn talents_unknown_skill_has_none() {
    ef().args(["talents", "--skill", "fishing", "--xp", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No talents defined for fishing"));
}

// ---------------------------------------------------------------------------
// curve
// ---------------------------------------------------------------------------

#[test]
fn curve_prints_levels() {
    ef().args(["curve", "--levels", "3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Level curve")
                .and(predicate::str::contains("100"))
                .and(predicate::str::contains("282")),
        );
}
