//! CLI frontend for the Emberfall encounter and progression engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ef",
    about = "Emberfall: run encounters and inspect progression",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fight an opponent until the encounter ends
    Fight {
        /// Opponent code (e.g. goblin)
        opponent: String,

        /// Character name (default: the catalog's first character)
        #[arg(short, long)]
        character: Option<String>,

        /// Comma-separated actions, repeated in order (attack, heavy_attack, defend, flee)
        #[arg(short, long, default_value = "attack")]
        tactic: String,

        /// RNG seed for a reproducible fight
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Give up after this many rounds
        #[arg(long, default_value = "100")]
        max_rounds: u32,

        /// Equip a tool with this much durability
        #[arg(long)]
        tool_durability: Option<u32>,

        /// Print the history record as text, markdown, or json
        #[arg(long)]
        history: Option<String>,

        /// Catalog JSON file (default: built-in sample)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Engine config JSON file (default: built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Award skill experience to a fresh track and show unlocked talents
    Talents {
        /// Skill track name
        #[arg(short, long, default_value = "combat")]
        skill: String,

        /// Experience to award
        #[arg(short, long, default_value = "0")]
        xp: i64,

        /// Catalog JSON file (default: built-in sample)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Engine config JSON file (default: built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the character level curve
    Curve {
        /// Number of levels to show
        #[arg(short, long, default_value = "10")]
        levels: u32,

        /// Engine config JSON file (default: built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a sample catalog
    Sample {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fight {
            opponent,
            character,
            tactic,
            seed,
            max_rounds,
            tool_durability,
            history,
            catalog,
            config,
        } => commands::fight::run(&commands::fight::FightArgs {
            opponent,
            character,
            tactic,
            seed,
            max_rounds,
            tool_durability,
            history,
            catalog,
            config,
        }),
        Commands::Talents {
            skill,
            xp,
            catalog,
            config,
        } => commands::talents::run(&skill, xp, catalog.as_deref(), config.as_deref()),
        Commands::Curve { levels, config } => commands::curve::run(levels, config.as_deref()),
        Commands::Sample { output } => commands::sample::run(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
