use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ef_core::SkillName;
use ef_mechanics::{Ledger, Progress, active_effects};

pub fn run(
    skill: &str,
    xp: i64,
    catalog: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let config = super::load_config(config)?;
    let talents = super::talent_catalog(&catalog);
    for problem in talents.inconsistencies() {
        eprintln!("warning: {problem}");
    }

    let skill = SkillName::new(skill);
    let training = Ledger::new(&config)
        .map_err(|e| e.to_string())?
        .train(&Progress::new(), &talents, &skill, xp);
    let track = &training.award.track;

    println!(
        "  {} level {} {}",
        skill.as_str().bold(),
        track.level,
        format!(
            "({}/{} xp, {} total)",
            track.current_experience, track.experience_to_next, track.total_experience
        )
        .dimmed()
    );
    println!();

    let nodes = talents.for_skill(&skill);
    if nodes.is_empty() {
        println!("  No talents defined for {skill}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Talent", "Tier", "Threshold", "Requires", "Effect", "Status"]);
    for node in &nodes {
        let requires: Vec<&str> = node.prerequisites.iter().map(|p| p.as_str()).collect();
        let status = if training.progress.talents.contains(&node.code) {
            "unlocked"
        } else {
            "locked"
        };
        table.add_row(vec![
            node.name.clone(),
            node.tier.to_string(),
            node.threshold.to_string(),
            if requires.is_empty() {
                "-".to_string()
            } else {
                requires.join(", ")
            },
            format!("{} {}", node.effect, node.magnitude),
            status.to_string(),
        ]);
    }
    println!("{table}");

    let effects = active_effects(&talents, &training.progress.talents, &skill);
    println!();
    if effects.is_empty() {
        println!("  No active effects.");
    } else {
        println!("  {}", "Active effects".bold());
        for (kind, magnitude) in effects.iter() {
            println!("    {kind}: {magnitude}");
        }
    }
    Ok(())
}
