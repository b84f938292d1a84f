//! Collaborator contracts.
//!
//! The engine owns no storage, inventory, or tool state. It talks to those
//! systems through these traits; [`memory`] has in-process adapters for
//! tests, tools, and single-player use.

pub mod memory;

pub use memory::{MemoryInventory, MemoryStore, NoDurability, ToolDurability};

use ef_core::{Character, CharacterId, Opponent, OpponentId};

use crate::encounter::Action;
use crate::error::EngineResult;
use crate::events::GameEvent;
use crate::history::HistoryRecord;
use crate::progression::Progress;
use crate::resolution::LootDrop;

/// Loads and saves characters, opponents, and progression.
pub trait Persistence {
    /// Load a character. Fails with `CharacterNotFound`.
    fn load_character(&self, id: CharacterId) -> EngineResult<Character>;

    /// Store a character.
    fn save_character(&mut self, character: &Character) -> EngineResult<()>;

    /// Load an opponent. Fails with `OpponentNotFound`.
    fn load_opponent(&self, id: &OpponentId) -> EngineResult<Opponent>;

    /// Load a character's skill tracks and unlocked talents. Empty if none.
    fn load_progress(&self, id: CharacterId) -> EngineResult<Progress>;

    /// Store a character's skill tracks and unlocked talents.
    fn save_progress(&mut self, id: CharacterId, progress: &Progress) -> EngineResult<()>;
}

/// Wear reported after a tool was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolWear {
    /// Name of the tool that was used.
    pub tool_name: String,
    /// Whether the tool broke on this use.
    pub broke: bool,
    /// Durability left.
    pub remaining: u32,
}

/// Consumes durability of the character's equipped tool.
pub trait Durability {
    /// Called once per landed strike. `Ok(None)` means no tool is equipped.
    fn consume_tool_durability(
        &mut self,
        character: CharacterId,
        action: Action,
    ) -> EngineResult<Option<ToolWear>>;
}

/// Receives loot.
pub trait Inventory {
    /// Add every drop to the character's inventory.
    ///
    /// Delivery is all or nothing: on `Err` no drop may have been added.
    fn add_items(&mut self, character: CharacterId, loot: &[LootDrop]) -> EngineResult<()>;
}

/// Receives the write-once record of every finished encounter.
pub trait HistorySink {
    /// Append a record.
    fn record(&mut self, record: HistoryRecord);
}

/// Receives events for quest and achievement systems.
pub trait EventSink {
    /// Publish an event.
    fn emit(&mut self, event: GameEvent);
}

/// The collaborators that receive the outputs of a resolution.
pub struct Sinks<'a> {
    /// Loot destination.
    pub inventory: &'a mut dyn Inventory,
    /// Encounter history destination.
    pub history: &'a mut dyn HistorySink,
    /// Event destination.
    pub events: &'a mut dyn EventSink,
}

impl<'a> Sinks<'a> {
    /// Bundle the three output collaborators.
    pub fn new(
        inventory: &'a mut dyn Inventory,
        history: &'a mut dyn HistorySink,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            inventory,
            history,
            events,
        }
    }
}
