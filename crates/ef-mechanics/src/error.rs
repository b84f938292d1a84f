//! Error types for the encounter and progression engine.

use ef_core::{CharacterId, CoreError, OpponentId, TalentCode};

use crate::encounter::EncounterStatus;

/// Errors that can occur while running encounters or awarding progression.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The character lacks the energy to start an encounter.
    #[error("insufficient energy: {required} required, {available} available")]
    InsufficientEnergy {
        /// Energy needed to start.
        required: u32,
        /// Energy the character has.
        available: u32,
    },

    /// An action tag was not recognized.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// An action was submitted against a finished encounter.
    #[error("encounter is closed ({status})")]
    EncounterClosed {
        /// The terminal status the encounter ended in.
        status: EncounterStatus,
    },

    /// Resolution was requested while the encounter is still running.
    #[error("encounter is still ongoing")]
    EncounterOngoing,

    /// The character already has an encounter running.
    #[error("character {0} is already in an encounter")]
    EncounterInProgress(CharacterId),

    /// The character has no encounter running in this session.
    #[error("character {0} has no active encounter")]
    EncounterNotActive(CharacterId),

    /// The encounter belongs to a different character than the one supplied.
    #[error("encounter belongs to character {expected}, got {found}")]
    EncounterMismatch {
        /// The encounter's character.
        expected: CharacterId,
        /// The character passed in.
        found: CharacterId,
    },

    /// No opponent with this code exists.
    #[error("opponent not found: {0}")]
    OpponentNotFound(OpponentId),

    /// No character with this ID exists.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// A talent prerequisite references a node that does not exist.
    #[error("talent {talent} requires unknown talent {missing}")]
    TalentGraphInconsistency {
        /// The talent with the dangling prerequisite.
        talent: TalentCode,
        /// The prerequisite code that matches no node.
        missing: TalentCode,
    },

    /// The engine configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Tool durability could not be consumed.
    #[error("durability error: {0}")]
    Durability(String),

    /// Loot could not be delivered to the inventory.
    #[error("inventory error: {0}")]
    Inventory(String),

    /// Catalog data was invalid.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
