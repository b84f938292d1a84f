use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::CharacterId;

/// Core attributes of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Adds `strength / 5` to every landed hit.
    pub strength: u32,
    /// Drives hit chance and flee chance.
    pub agility: u32,
    /// Carried for crafting consumers; unused in combat.
    pub intelligence: u32,
    /// Drives critical chance and loot rolls.
    pub luck: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: 10,
            agility: 10,
            intelligence: 10,
            luck: 5,
        }
    }
}

/// Health and energy pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current energy.
    pub energy: u32,
    /// Maximum energy.
    pub max_energy: u32,
}

impl Vitals {
    /// Create vitals starting at their maximums.
    pub fn full(max_health: u32, max_energy: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            energy: max_energy,
            max_energy,
        }
    }

    /// Refill health and energy to their maximums.
    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.energy = self.max_energy;
    }

    /// Spend energy, stopping at zero. Returns the energy actually spent.
    pub fn spend_energy(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.energy);
        self.energy -= spent;
        spent
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::full(100, 50)
    }
}

/// A player-controlled character.
///
/// `attack` and `defense` are gear-derived ratings supplied by whoever owns
/// equipment; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    #[serde(default)]
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Core attributes.
    #[serde(default)]
    pub stats: Stats,
    /// Health and energy.
    #[serde(default)]
    pub vitals: Vitals,
    /// Attack rating.
    #[serde(default = "default_attack")]
    pub attack: u32,
    /// Defense rating.
    #[serde(default)]
    pub defense: u32,
    /// Character level (starts at 1).
    #[serde(default = "default_level")]
    pub level: u32,
    /// Total experience accumulated over the character's lifetime.
    #[serde(default)]
    pub experience: u64,
}

fn default_attack() -> u32 {
    10
}

fn default_level() -> u32 {
    1
}

impl Character {
    /// Create a level 1 character with default stats and full vitals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            stats: Stats::default(),
            vitals: Vitals::default(),
            attack: default_attack(),
            defense: 0,
            level: default_level(),
            experience: 0,
        }
    }

    /// Replace the core attributes.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Replace the vitals.
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    /// Set the gear-derived attack and defense ratings.
    pub fn with_combat(mut self, attack: u32, defense: u32) -> Self {
        self.attack = attack;
        self.defense = defense;
        self
    }

    /// Returns true if the character has no health left.
    pub fn is_down(&self) -> bool {
        self.vitals.health == 0
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (lvl {}, HP {}/{}, EN {}/{})",
            self.name,
            self.level,
            self.vitals.health,
            self.vitals.max_health,
            self.vitals.energy,
            self.vitals.max_energy
        )
    }
}
