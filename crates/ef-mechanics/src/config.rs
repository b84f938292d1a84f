//! Engine configuration with documented constants.
//!
//! Every tunable number the engine uses lives here. A JSON file may
//! override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use ef_core::SkillName;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Current configuration schema version.
pub const CONFIG_VERSION: u32 = 1;

/// Combat formula constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Hit chance of a character with 10 agility.
    pub base_accuracy: f64,
    /// Hit chance gained per point of agility above 10.
    pub agility_factor: f64,
    /// Lower clamp for hit chance.
    pub min_hit_chance: f64,
    /// Upper clamp for hit chance.
    pub max_hit_chance: f64,
    /// Heavy attacks multiply hit chance by this (< 1).
    pub heavy_accuracy_penalty: f64,
    /// Heavy attacks multiply base damage by this (> 1).
    pub heavy_damage_multiplier: f64,
    /// Critical chance per point of luck.
    pub crit_factor: f64,
    /// Critical hits multiply base damage by this.
    pub crit_multiplier: f64,
    /// Flee chance before agility.
    pub flee_base_chance: f64,
    /// Flee chance gained per point of agility.
    pub flee_agility_factor: f64,
    /// Energy required to start, and spent to finish, a fight.
    pub encounter_energy_cost: u32,
    /// Energy spent when escaping.
    pub flee_energy_cost: u32,
    /// Health a defeated character is left with. Never below 1.
    pub defeat_health: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_accuracy: 0.85,
            agility_factor: 0.02,
            min_hit_chance: 0.50,
            max_hit_chance: 0.95,
            heavy_accuracy_penalty: 0.8,
            heavy_damage_multiplier: 1.5,
            crit_factor: 0.01,
            crit_multiplier: 2.0,
            flee_base_chance: 0.40,
            flee_agility_factor: 0.02,
            encounter_energy_cost: 5,
            flee_energy_cost: 2,
            defeat_health: 1,
        }
    }
}

/// Victory experience constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Opponent experience reward is multiplied by this.
    pub xp_multiplier: f64,
    /// Bonus for winning without taking damage.
    pub perfect_bonus: u64,
    /// Bonus for winning within `quick_round_limit` rounds.
    pub quick_bonus: u64,
    /// Round count at or below which a victory counts as quick.
    pub quick_round_limit: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            xp_multiplier: 1.5,
            perfect_bonus: 10,
            quick_bonus: 5,
            quick_round_limit: 3,
        }
    }
}

/// Loot roll constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Drop chance added per point of luck.
    pub luck_chance_factor: f64,
    /// Chance per point of luck of one extra unit.
    pub luck_quantity_factor: f64,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            luck_chance_factor: 0.005,
            luck_quantity_factor: 0.01,
        }
    }
}

/// Character level curve: `xp_for_level(l) = floor(base × (l − 1)^exponent × multiplier)`.
///
/// Thresholds are cumulative: a character is level `l` once their total
/// experience reaches `xp_for_level(l)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpCurve {
    /// Scale of the curve.
    pub base: f64,
    /// Steepness of the curve.
    pub exponent: f64,
    /// Global multiplier.
    pub multiplier: f64,
}

impl XpCurve {
    /// Total experience required to be at `level`.
    pub fn xp_for_level(&self, level: u32) -> u64 {
        if level <= 1 {
            return 0;
        }
        let steps = f64::from(level - 1);
        (self.base * steps.powf(self.exponent) * self.multiplier).floor() as u64
    }
}

impl Default for XpCurve {
    fn default() -> Self {
        Self {
            base: 100.0,
            exponent: 1.5,
            multiplier: 1.0,
        }
    }
}

/// Stat growth applied on every character level-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpBonuses {
    /// Added to max health per level.
    pub max_health: u32,
    /// Added to max energy per level.
    pub max_energy: u32,
    /// Every this many levels, core stats grow.
    pub stat_interval: u32,
    /// Added to strength, agility, and intelligence at each interval.
    pub primary_stats: u32,
    /// Added to luck at each interval.
    pub luck: u32,
}

impl Default for LevelUpBonuses {
    fn default() -> Self {
        Self {
            max_health: 10,
            max_energy: 5,
            stat_interval: 5,
            primary_stats: 2,
            luck: 1,
        }
    }
}

/// Skill track curve: `threshold(level) = base_multiplier × level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCurve {
    /// Experience per level step.
    pub base_multiplier: u64,
}

impl SkillCurve {
    /// Experience needed to advance from `level` to `level + 1`.
    pub fn threshold(&self, level: u32) -> u64 {
        self.base_multiplier.saturating_mul(u64::from(level))
    }
}

impl Default for SkillCurve {
    fn default() -> Self {
        Self {
            base_multiplier: 100,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Schema version of this configuration.
    pub version: u32,
    /// Combat formulas.
    pub combat: CombatConfig,
    /// Victory experience.
    pub rewards: RewardConfig,
    /// Loot rolls.
    pub loot: LootConfig,
    /// Character level curve.
    pub xp_curve: XpCurve,
    /// Level-up stat growth.
    pub level_up: LevelUpBonuses,
    /// Skill track curve.
    pub skill_curve: SkillCurve,
    /// Skill track that receives combat experience and supplies combat effects.
    pub combat_skill: SkillName,
    /// Upper bound on levels gained from a single award.
    pub max_levels_per_award: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            combat: CombatConfig::default(),
            rewards: RewardConfig::default(),
            loot: LootConfig::default(),
            xp_curve: XpCurve::default(),
            level_up: LevelUpBonuses::default(),
            skill_curve: SkillCurve::default(),
            combat_skill: SkillName::new("combat"),
            max_levels_per_award: 1000,
        }
    }
}

impl EngineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the combat constants.
    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Replace the reward constants.
    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    /// Replace the loot constants.
    pub fn with_loot(mut self, loot: LootConfig) -> Self {
        self.loot = loot;
        self
    }

    /// Replace the character level curve.
    pub fn with_xp_curve(mut self, xp_curve: XpCurve) -> Self {
        self.xp_curve = xp_curve;
        self
    }

    /// Replace the level-up bonuses.
    pub fn with_level_up(mut self, level_up: LevelUpBonuses) -> Self {
        self.level_up = level_up;
        self
    }

    /// Replace the skill track curve.
    pub fn with_skill_curve(mut self, skill_curve: SkillCurve) -> Self {
        self.skill_curve = skill_curve;
        self
    }

    /// Set the skill track used for combat.
    pub fn with_combat_skill(mut self, skill: impl Into<SkillName>) -> Self {
        self.combat_skill = skill.into();
        self
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Validate configuration for internal consistency.
    ///
    /// Rejects curves that would not strictly increase, which would let a
    /// single award loop through levels without bound.
    pub fn validate(&self) -> EngineResult<()> {
        if self.version != CONFIG_VERSION {
            return Err(invalid(format!(
                "unsupported config version {} (expected {CONFIG_VERSION})",
                self.version
            )));
        }

        let curve = &self.xp_curve;
        if !(curve.base > 0.0 && curve.exponent > 0.0 && curve.multiplier > 0.0) {
            return Err(invalid(format!(
                "xp curve must be strictly positive (base {}, exponent {}, multiplier {})",
                curve.base, curve.exponent, curve.multiplier
            )));
        }
        if self.skill_curve.base_multiplier == 0 {
            return Err(invalid("skill curve base_multiplier must be > 0"));
        }
        if self.max_levels_per_award == 0 {
            return Err(invalid("max_levels_per_award must be > 0"));
        }

        let c = &self.combat;
        for (name, p) in [
            ("base_accuracy", c.base_accuracy),
            ("min_hit_chance", c.min_hit_chance),
            ("max_hit_chance", c.max_hit_chance),
            ("flee_base_chance", c.flee_base_chance),
        ] {
            check_probability(name, p)?;
        }
        if c.min_hit_chance > c.max_hit_chance {
            return Err(invalid(format!(
                "min_hit_chance ({}) must be <= max_hit_chance ({})",
                c.min_hit_chance, c.max_hit_chance
            )));
        }
        if !(c.heavy_accuracy_penalty > 0.0 && c.heavy_accuracy_penalty < 1.0) {
            return Err(invalid("heavy_accuracy_penalty must be in (0, 1)"));
        }
        if c.heavy_damage_multiplier <= 1.0 {
            return Err(invalid("heavy_damage_multiplier must be > 1"));
        }
        if c.crit_multiplier < 1.0 {
            return Err(invalid("crit_multiplier must be >= 1"));
        }
        for (name, factor) in [
            ("agility_factor", c.agility_factor),
            ("crit_factor", c.crit_factor),
            ("flee_agility_factor", c.flee_agility_factor),
            ("luck_chance_factor", self.loot.luck_chance_factor),
            ("luck_quantity_factor", self.loot.luck_quantity_factor),
            ("xp_multiplier", self.rewards.xp_multiplier),
        ] {
            if !(factor >= 0.0 && factor.is_finite()) {
                return Err(invalid(format!("{name} must be a finite non-negative number")));
            }
        }
        if self.level_up.stat_interval == 0 {
            return Err(invalid("level_up.stat_interval must be > 0"));
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> EngineResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(format!("{name} ({p}) must be within [0, 1]")))
    }
}

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig(msg.into())
}
