use std::path::Path;

use ef_core::{Catalog, Character, EffectKind, LootEntry, Opponent, Stats, TalentNode, Vitals};

/// A small catalog covering every opponent tier and effect kind.
pub fn catalog() -> Catalog {
    let kael = Character::new("Kael")
        .with_stats(Stats {
            strength: 12,
            agility: 11,
            intelligence: 8,
            luck: 6,
        })
        .with_vitals(Vitals::full(100, 50))
        .with_combat(14, 4);
    let mira = Character::new("Mira")
        .with_stats(Stats {
            strength: 8,
            agility: 14,
            intelligence: 12,
            luck: 9,
        })
        .with_vitals(Vitals::full(80, 60))
        .with_combat(11, 3);

    let goblin = Opponent::new("goblin", "Goblin", 30, 8, 3, 10)
        .with_loot("copper_coin", LootEntry::new(1, 3, 0.6))
        .with_loot("goblin_ear", LootEntry::new(1, 1, 0.3));
    let wolf = Opponent::new("wolf", "Grey Wolf", 45, 11, 4, 18)
        .with_loot("wolf_pelt", LootEntry::new(1, 2, 0.5));
    let mut troll = Opponent::new("troll", "Cave Troll", 120, 18, 8, 60)
        .with_loot("troll_hide", LootEntry::new(1, 1, 0.4))
        .with_loot("copper_coin", LootEntry::new(5, 12, 0.9));
    troll.level = 5;
    troll.strength = 10;

    let talents = vec![
        named(
            TalentNode::new("keen_eye", "combat", 1, 50, EffectKind::LootBonusChance, 0.15),
            "Keen Eye",
            "Spot the extra coin in every pouch.",
        ),
        named(
            TalentNode::new("sharpened_blade", "combat", 1, 100, EffectKind::DamageBonus, 2.0),
            "Sharpened Blade",
            "Every landed blow cuts a little deeper.",
        ),
        named(
            TalentNode::new("second_wind", "combat", 2, 300, EffectKind::EnergyCostReduction, 0.2)
                .requires("sharpened_blade"),
            "Second Wind",
            "Fights tire you less.",
        ),
        named(
            TalentNode::new("slayer", "combat", 3, 1000, EffectKind::DamageBonus, 5.0)
                .requires("second_wind"),
            "Slayer",
            "Strike where it hurts most.",
        ),
        named(
            TalentNode::new("frugal_smith", "smithing", 1, 50, EffectKind::MaterialCostReduction, 0.1),
            "Frugal Smith",
            "Waste less metal at the anvil.",
        ),
        named(
            TalentNode::new("artisan", "smithing", 2, 250, EffectKind::BonusOutputChance, 0.1)
                .requires("frugal_smith"),
            "Artisan",
            "Sometimes the forge gives back more.",
        ),
        named(
            TalentNode::new("prospector", "mining", 1, 80, EffectKind::GatherYieldBonus, 0.2),
            "Prospector",
            "Find the richer seams.",
        ),
    ];

    Catalog {
        characters: vec![kael, mira],
        opponents: vec![goblin, wolf, troll],
        talents,
    }
}

fn named(mut node: TalentNode, name: &str, description: &str) -> TalentNode {
    node.name = name.to_string();
    node.description = description.to_string();
    node
}

pub fn run(output: Option<&Path>) -> Result<(), String> {
    let json = catalog().to_json().map_err(|e| e.to_string())?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            println!("  Wrote sample catalog to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
