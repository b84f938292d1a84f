//! Progression ledger: experience, skill tracks, and level-ups.
//!
//! Awards never mutate the caller's values in place; each operation takes
//! the current state and returns the updated one alongside a report of
//! what changed.

pub mod level;

pub use level::CharacterAward;

use std::collections::BTreeMap;

use ef_core::{SkillName, SkillTrack, TalentBook, TalentCode};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::talents::TalentCatalog;

/// A character's skill tracks and unlocked talents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Skill tracks, created on first award.
    pub tracks: BTreeMap<SkillName, SkillTrack>,
    /// Unlocked talents across all skills.
    pub talents: TalentBook,
}

impl Progress {
    /// Create empty progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a skill track.
    pub fn track(&self, skill: &SkillName) -> Option<&SkillTrack> {
        self.tracks.get(skill)
    }
}

/// Result of awarding experience to one skill track.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAward {
    /// The track after the award.
    pub track: SkillTrack,
    /// Levels gained by this award.
    pub levels_gained: u32,
    /// Experience actually added (negative requests are clamped to 0).
    pub awarded: u64,
}

/// Result of training a skill: the award plus any talents it unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    /// Progress after the award and unlock refresh.
    pub progress: Progress,
    /// The skill award.
    pub award: SkillAward,
    /// Talents unlocked by this award.
    pub unlocked: Vec<TalentCode>,
}

/// Applies the configured experience curves.
#[derive(Debug, Clone, Copy)]
pub struct Ledger<'a> {
    config: &'a EngineConfig,
}

impl<'a> Ledger<'a> {
    /// Create a ledger over a configuration. Fails if the config is invalid.
    pub fn new(config: &'a EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// A fresh level 1 track for `skill`.
    pub fn new_track(&self, skill: &SkillName) -> SkillTrack {
        SkillTrack::new(skill.clone(), self.config.skill_curve.threshold(1))
    }

    /// Add experience to a skill track, rolling overflow into levels.
    ///
    /// Zero or negative amounts are no-ops. The level loop is bounded by
    /// `max_levels_per_award`; excess experience past the bound stays in
    /// `current_experience`.
    pub fn award_experience(&self, track: &SkillTrack, amount: i64) -> SkillAward {
        let mut track = track.clone();
        let awarded = u64::try_from(amount).unwrap_or(0);
        if awarded == 0 {
            return SkillAward {
                track,
                levels_gained: 0,
                awarded,
            };
        }

        track.current_experience = track.current_experience.saturating_add(awarded);
        track.total_experience = track.total_experience.saturating_add(awarded);

        let mut levels_gained = 0;
        while track.current_experience >= track.experience_to_next {
            if levels_gained >= self.config.max_levels_per_award || track.experience_to_next == 0 {
                tracing::warn!(
                    skill = %track.skill,
                    level = track.level,
                    "skill level-up loop stopped at the per-award bound"
                );
                break;
            }
            track.current_experience -= track.experience_to_next;
            track.level += 1;
            track.experience_to_next = self.config.skill_curve.threshold(track.level);
            levels_gained += 1;
        }

        if levels_gained > 0 {
            tracing::debug!(skill = %track.skill, level = track.level, levels_gained, "skill level up");
        }

        SkillAward {
            track,
            levels_gained,
            awarded,
        }
    }

    /// Award skill experience, creating the track if needed, then refresh
    /// the skill's talent unlocks.
    pub fn train(
        &self,
        progress: &Progress,
        talents: &TalentCatalog,
        skill: &SkillName,
        amount: i64,
    ) -> Training {
        let mut progress = progress.clone();
        let current = progress
            .tracks
            .get(skill)
            .cloned()
            .unwrap_or_else(|| self.new_track(skill));

        let award = self.award_experience(&current, amount);
        let (talents_after, unlocked) =
            talents.refresh_unlocks(std::mem::take(&mut progress.talents), &award.track);
        progress.talents = talents_after;
        progress.tracks.insert(skill.clone(), award.track.clone());

        Training {
            progress,
            award,
            unlocked,
        }
    }
}
