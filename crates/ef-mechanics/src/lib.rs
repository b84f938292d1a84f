//! Encounter resolution and progression engine for Emberfall.
//!
//! Turns a player's combat actions and accumulated experience into
//! reproducible state transitions: combat rounds, victory/defeat/flee
//! resolution, loot rolls, experience awards, multi-level level-ups, and
//! talent unlocks whose effects feed back into later encounters.
//!
//! All randomness is drawn from a [`Dice`] source, so seeding it replays an
//! encounter exactly.

pub mod config;
pub mod dice;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod events;
pub mod history;
pub mod ports;
pub mod progression;
pub mod resolution;
pub mod session;
pub mod talents;

pub use config::EngineConfig;
pub use dice::{Dice, ScriptedDice};
pub use effects::{EffectSet, active_effects};
pub use encounter::{Action, Encounter, EncounterStatus, RoundReport};
pub use error::{EngineError, EngineResult};
pub use events::{EventQueue, GameEvent};
pub use history::{HistoryLog, HistoryRecord};
pub use ports::{Durability, EventSink, HistorySink, Inventory, Persistence, Sinks, ToolWear};
pub use progression::{CharacterAward, Ledger, Progress, SkillAward, Training};
pub use resolution::{LootDrop, Resolution, Resolver, XpBreakdown};
pub use session::Session;
pub use talents::TalentCatalog;
