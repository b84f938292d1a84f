//! Events published for quest and achievement systems.

use std::collections::VecDeque;

use ef_core::{CharacterId, OpponentId, SkillName};
use serde::{Deserialize, Serialize};

use crate::ports::EventSink;

/// Something that happened that other systems may care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A character won an encounter.
    MobDefeated {
        /// The victor.
        character_id: CharacterId,
        /// The defeated opponent.
        opponent_id: OpponentId,
    },
    /// A character finished crafting something.
    CraftCompleted {
        /// The crafter.
        character_id: CharacterId,
        /// The skill the recipe trains.
        skill: SkillName,
        /// What was crafted.
        recipe: String,
    },
    /// A character reached a new level.
    LevelReached {
        /// The character.
        character_id: CharacterId,
        /// The level reached.
        level: u32,
    },
}

impl GameEvent {
    /// The character the event is about.
    pub fn character_id(&self) -> CharacterId {
        match self {
            Self::MobDefeated { character_id, .. }
            | Self::CraftCompleted { character_id, .. }
            | Self::LevelReached { character_id, .. } => *character_id,
        }
    }
}

/// A FIFO buffer of events waiting to be consumed.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }
}
