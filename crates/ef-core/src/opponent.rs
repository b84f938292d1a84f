use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::id::{ItemId, OpponentId};

/// One row of a loot table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Minimum quantity dropped.
    pub min: u32,
    /// Maximum quantity dropped (inclusive).
    pub max: u32,
    /// Base drop chance in `[0, 1]`.
    pub chance: f64,
}

impl LootEntry {
    /// Create a loot entry.
    pub fn new(min: u32, max: u32, chance: f64) -> Self {
        Self { min, max, chance }
    }
}

/// Item → drop entry. Ordered so loot rolls are reproducible under a seed.
pub type LootTable = BTreeMap<ItemId, LootEntry>;

/// An enemy a character can fight. Read-only catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    /// Catalog code.
    pub id: OpponentId,
    /// Display name.
    pub name: String,
    /// Opponent level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Starting health.
    pub health: u32,
    /// Attack rating.
    pub attack: u32,
    /// Defense rating.
    pub defense: u32,
    /// Adds `strength / 5` to every counter-attack. Usually 0.
    #[serde(default)]
    pub strength: u32,
    /// Experience awarded on defeat, before multipliers and bonuses.
    pub experience_reward: u64,
    /// Possible drops.
    #[serde(default)]
    pub loot: LootTable,
}

fn default_level() -> u32 {
    1
}

impl Opponent {
    /// Create an opponent with an empty loot table.
    pub fn new(
        id: impl Into<OpponentId>,
        name: impl Into<String>,
        health: u32,
        attack: u32,
        defense: u32,
        experience_reward: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: default_level(),
            health,
            attack,
            defense,
            strength: 0,
            experience_reward,
            loot: LootTable::new(),
        }
    }

    /// Add a loot table row.
    pub fn with_loot(mut self, item: impl Into<ItemId>, entry: LootEntry) -> Self {
        self.loot.insert(item.into(), entry);
        self
    }

    /// Check that every loot entry has `min <= max` and a chance in `[0, 1]`.
    pub fn validate(&self) -> CoreResult<()> {
        for (item, entry) in &self.loot {
            let reason = if entry.min > entry.max {
                Some(format!("min {} > max {}", entry.min, entry.max))
            } else if !(0.0..=1.0).contains(&entry.chance) {
                Some(format!("chance {} outside [0, 1]", entry.chance))
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CoreError::InvalidLootEntry {
                    opponent: self.id.clone(),
                    item: item.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }
}
