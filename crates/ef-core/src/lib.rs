//! Core types for Emberfall: characters, opponents, skill tracks, and talents.
//!
//! This crate defines the data the progression and encounter engine works
//! on. It holds no game rules of its own. You can construct a [`Catalog`]
//! programmatically or deserialize one from JSON.

/// Catalog of characters, opponents, and talent nodes loadable from JSON.
pub mod catalog;
/// Player characters: stats, vitals, and level.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Identifier newtypes.
pub mod id;
/// Opponents and their loot tables.
pub mod opponent;
/// Per-skill progression tracks.
pub mod skill;
/// Talent nodes, effect kinds, and unlocked talents.
pub mod talent;

/// Re-export catalog types.
pub use catalog::Catalog;
/// Re-export character types.
pub use character::{Character, Stats, Vitals};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export identifier types.
pub use id::{CharacterId, ItemId, OpponentId, SkillName, TalentCode};
/// Re-export opponent types.
pub use opponent::{LootEntry, LootTable, Opponent};
/// Re-export skill track types.
pub use skill::SkillTrack;
/// Re-export talent types.
pub use talent::{EffectKind, TalentBook, TalentNode, UnlockedTalent};
