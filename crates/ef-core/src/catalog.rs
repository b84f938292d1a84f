use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::error::{CoreError, CoreResult};
use crate::id::OpponentId;
use crate::opponent::Opponent;
use crate::talent::TalentNode;

/// Static game data: starting characters, opponents, and talent trees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Characters available to play.
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Opponents that can be fought.
    #[serde(default)]
    pub opponents: Vec<Opponent>,
    /// Talent nodes of every skill track.
    #[serde(default)]
    pub talents: Vec<TalentNode>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse, and validate a catalog file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the catalog as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject duplicate identifiers and malformed loot tables.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for opponent in &self.opponents {
            if !seen.insert(opponent.id.as_str()) {
                return Err(CoreError::DuplicateId {
                    kind: "opponent",
                    id: opponent.id.to_string(),
                });
            }
            opponent.validate()?;
        }

        let mut seen = HashSet::new();
        for talent in &self.talents {
            if !seen.insert(talent.code.as_str()) {
                return Err(CoreError::DuplicateId {
                    kind: "talent",
                    id: talent.code.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for character in &self.characters {
            if !seen.insert(character.id) {
                return Err(CoreError::DuplicateId {
                    kind: "character",
                    id: character.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Look up an opponent by code.
    pub fn opponent(&self, id: &OpponentId) -> Option<&Opponent> {
        self.opponents.iter().find(|o| &o.id == id)
    }

    /// Look up a character by name (case-insensitive).
    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        let lower = name.to_lowercase();
        self.characters
            .iter()
            .find(|c| c.name.to_lowercase() == lower)
    }
}
