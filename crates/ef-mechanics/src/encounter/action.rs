//! Player actions available in an encounter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// What the character does this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// A normal strike.
    Attack,
    /// A slower, harder strike: less accurate, more damage.
    HeavyAttack,
    /// Deal no damage and halve the incoming blow.
    Defend,
    /// Try to escape.
    Flee,
}

impl Action {
    /// Whether this action strikes the opponent.
    pub fn is_attack(self) -> bool {
        matches!(self, Self::Attack | Self::HeavyAttack)
    }

    /// The canonical tag for this action.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::HeavyAttack => "heavy_attack",
            Self::Defend => "defend",
            Self::Flee => "flee",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Action {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attack" => Ok(Self::Attack),
            "heavy_attack" | "heavy" => Ok(Self::HeavyAttack),
            "defend" => Ok(Self::Defend),
            "flee" => Ok(Self::Flee),
            _ => Err(EngineError::InvalidAction(s.to_string())),
        }
    }
}
