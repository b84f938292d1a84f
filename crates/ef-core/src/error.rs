use crate::id::{ItemId, OpponentId};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or loading catalog data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two catalog records share the same identifier.
    #[error("duplicate {kind} id: \"{id}\"")]
    DuplicateId {
        /// What kind of record was duplicated (opponent, talent, character).
        kind: &'static str,
        /// The duplicated identifier.
        id: String,
    },

    /// A loot table entry has an empty quantity range or an invalid chance.
    #[error("invalid loot entry {item} on {opponent}: {reason}")]
    InvalidLootEntry {
        /// The opponent owning the loot table.
        opponent: OpponentId,
        /// The offending item.
        item: ItemId,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The catalog file could not be parsed.
    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),
}
