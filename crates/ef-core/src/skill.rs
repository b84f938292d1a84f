use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::SkillName;

/// Progression state for one skill of one character.
///
/// Between awards `current_experience < experience_to_next` always holds;
/// overflow is rolled into levels by the progression ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTrack {
    /// Which skill this track belongs to.
    pub skill: SkillName,
    /// Skill level (starts at 1).
    pub level: u32,
    /// Experience collected toward the next level.
    pub current_experience: u64,
    /// Experience needed to reach the next level.
    pub experience_to_next: u64,
    /// Lifetime experience in this skill. Never decreases.
    pub total_experience: u64,
}

impl SkillTrack {
    /// Create a level 1 track with the given first threshold.
    pub fn new(skill: impl Into<SkillName>, experience_to_next: u64) -> Self {
        Self {
            skill: skill.into(),
            level: 1,
            current_experience: 0,
            experience_to_next,
            total_experience: 0,
        }
    }

    /// Fraction of the way to the next level (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.experience_to_next == 0 {
            return 1.0;
        }
        self.current_experience as f64 / self.experience_to_next as f64
    }
}

impl fmt::Display for SkillTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lvl {} ({}/{})",
            self.skill, self.level, self.current_experience, self.experience_to_next
        )
    }
}
