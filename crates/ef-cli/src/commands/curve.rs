use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(levels: u32, config: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config)?;
    let curve = &config.xp_curve;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Total XP", "To next", "Stat bonus"]);

    for level in 1..=levels.max(1) {
        let total = curve.xp_for_level(level);
        let next = curve.xp_for_level(level + 1).saturating_sub(total);
        let bonus = if level > 1 && level % config.level_up.stat_interval == 0 {
            "yes"
        } else {
            ""
        };
        table.add_row(vec![
            level.to_string(),
            total.to_string(),
            next.to_string(),
            bonus.to_string(),
        ]);
    }

    println!(
        "  {} {}",
        "Level curve".bold(),
        format!(
            "(base {}, exponent {}, multiplier {})",
            curve.base, curve.exponent, curve.multiplier
        )
        .dimmed()
    );
    println!("{table}");
    Ok(())
}
