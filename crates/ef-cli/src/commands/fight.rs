use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ef_core::OpponentId;
use ef_mechanics::ports::{MemoryInventory, MemoryStore, NoDurability, ToolDurability};
use ef_mechanics::{
    Action, Durability, EncounterStatus, EventQueue, HistoryLog, Session, Sinks,
};

const HISTORY_FORMATS: [&str; 4] = ["text", "markdown", "md", "json"];

/// Options for one fight.
pub struct FightArgs {
    pub opponent: String,
    pub character: Option<String>,
    pub tactic: String,
    pub seed: u64,
    pub max_rounds: u32,
    pub tool_durability: Option<u32>,
    pub history: Option<String>,
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn run(args: &FightArgs) -> Result<(), String> {
    let catalog = super::load_catalog(args.catalog.as_deref())?;
    let config = super::load_config(args.config.as_deref())?;
    let tactic = parse_tactic(&args.tactic)?;
    if let Some(format) = args
        .history
        .as_deref()
        .filter(|f| !HISTORY_FORMATS.contains(f))
    {
        return Err(format!(
            "unknown history format: {format} (expected text, markdown, json)"
        ));
    }

    let character = match &args.character {
        Some(name) => catalog
            .character_by_name(name)
            .ok_or_else(|| format!("character not found: \"{name}\""))?,
        None => catalog
            .characters
            .first()
            .ok_or("catalog has no characters")?,
    }
    .clone();

    let store = MemoryStore::from_catalog(&catalog);
    let talents = super::talent_catalog(&catalog);
    let mut session = Session::new(config, talents, store, args.seed).map_err(|e| e.to_string())?;

    let opponent_id = OpponentId::new(args.opponent.as_str());
    let mut encounter = session
        .start_encounter(character.id, &opponent_id)
        .map_err(|e| e.to_string())?;

    let mut durability: Box<dyn Durability> = match args.tool_durability {
        Some(points) => Box::new(ToolDurability::new("Iron Sword", points)),
        None => Box::new(NoDurability),
    };

    for &action in tactic.iter().cycle() {
        if encounter.is_over() || encounter.round() >= args.max_rounds {
            break;
        }
        session
            .act(&mut encounter, action, durability.as_mut())
            .map_err(|e| e.to_string())?;
    }

    if !encounter.is_over() {
        session.release(character.id);
        for line in encounter.log() {
            println!("  {line}");
        }
        return Err(format!("no outcome after {} rounds", args.max_rounds));
    }

    let opponent_name = encounter.opponent().name.clone();
    let mut inventory = MemoryInventory::new();
    let mut history = HistoryLog::new();
    let mut events = EventQueue::new();
    let resolution = {
        let mut sinks = Sinks::new(&mut inventory, &mut history, &mut events);
        session
            .conclude(encounter, &mut sinks)
            .map_err(|e| e.to_string())?
    };

    println!(
        "  {} vs {} {}",
        character.name.bold(),
        opponent_name.bold(),
        format!("(seed={})", args.seed).dimmed()
    );
    println!();
    for line in &resolution.log {
        println!("  {line}");
    }
    println!();

    let result = match resolution.status {
        EncounterStatus::Victory => "victory".green().bold(),
        EncounterStatus::Defeat => "defeat".red().bold(),
        EncounterStatus::Fled => "fled".yellow().bold(),
        EncounterStatus::Ongoing => "ongoing".normal(),
    };
    let xp = &resolution.experience;
    let loot: Vec<String> = resolution
        .loot
        .iter()
        .map(|d| format!("{} x{}", d.item, d.quantity))
        .collect();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", ""]);
    table.add_row(vec!["Result".to_string(), result.to_string()]);
    let record = &resolution.record;
    table.add_row(vec!["Rounds".to_string(), record.rounds.to_string()]);
    table.add_row(vec![
        "Damage".to_string(),
        format!(
            "dealt {}, taken {}",
            record.damage_dealt, record.damage_taken
        ),
    ]);
    table.add_row(vec![
        "Experience".to_string(),
        format!(
            "{} (base {}, perfect {}, quick {})",
            xp.total(),
            xp.base,
            xp.perfect_bonus,
            xp.quick_bonus
        ),
    ]);
    table.add_row(vec![
        "Loot".to_string(),
        if loot.is_empty() {
            "-".to_string()
        } else {
            loot.join(", ")
        },
    ]);
    table.add_row(vec!["Character".to_string(), resolution.after.to_string()]);
    table.add_row(vec![
        "Energy spent".to_string(),
        resolution.energy_spent.to_string(),
    ]);
    if !resolution.unlocked.is_empty() {
        let unlocked: Vec<&str> = resolution.unlocked.iter().map(|c| c.as_str()).collect();
        table.add_row(vec!["Talents".to_string(), unlocked.join(", ")]);
    }
    println!("{table}");

    for event in events.drain() {
        let json = serde_json::to_string(&event).map_err(|e| e.to_string())?;
        println!("  {} {json}", "event".dimmed());
    }

    match args.history.as_deref() {
        None => {}
        Some("text") => print!("{}", history.export_text()),
        Some("markdown" | "md") => print!("{}", history.export_markdown()),
        Some("json") => println!("{}", history.to_json().map_err(|e| e.to_string())?),
        Some(_) => {}
    }

    Ok(())
}

fn parse_tactic(tactic: &str) -> Result<Vec<Action>, String> {
    let actions = tactic
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Action>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    if actions.is_empty() {
        return Err("tactic needs at least one action".into());
    }
    Ok(actions)
}
