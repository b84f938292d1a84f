use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{SkillName, TalentCode};

/// What a talent modifies.
///
/// The set is closed: every consumer matches the kinds it understands and
/// ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Fraction of crafting materials saved.
    MaterialCostReduction,
    /// Chance of producing an extra crafted item.
    BonusOutputChance,
    /// Fraction of energy costs saved.
    EnergyCostReduction,
    /// Chance of one extra unit on every successful loot drop.
    LootBonusChance,
    /// Flat damage added to every landed hit.
    DamageBonus,
    /// Extra units yielded by gathering.
    GatherYieldBonus,
}

impl EffectKind {
    /// All effect kinds, in declaration order.
    pub const ALL: [EffectKind; 6] = [
        Self::MaterialCostReduction,
        Self::BonusOutputChance,
        Self::EnergyCostReduction,
        Self::LootBonusChance,
        Self::DamageBonus,
        Self::GatherYieldBonus,
    ];

    /// The snake_case tag used in catalog files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::MaterialCostReduction => "material_cost_reduction",
            Self::BonusOutputChance => "bonus_output_chance",
            Self::EnergyCostReduction => "energy_cost_reduction",
            Self::LootBonusChance => "loot_bonus_chance",
            Self::DamageBonus => "damage_bonus",
            Self::GatherYieldBonus => "gather_yield_bonus",
        }
    }

    /// Parse a catalog tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag.trim())
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An unlockable modifier in a skill's talent tree. Immutable catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentNode {
    /// Unique code.
    pub code: TalentCode,
    /// Display name.
    pub name: String,
    /// The skill track this talent belongs to.
    pub skill: SkillName,
    /// Tier within the tree (lower tiers are evaluated first).
    pub tier: u32,
    /// Lifetime skill experience required.
    pub threshold: u64,
    /// Talents that must already be unlocked.
    #[serde(default)]
    pub prerequisites: Vec<TalentCode>,
    /// What the talent modifies.
    pub effect: EffectKind,
    /// How strongly.
    pub magnitude: f64,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
}

impl TalentNode {
    /// Create a talent with no prerequisites.
    pub fn new(
        code: impl Into<TalentCode>,
        skill: impl Into<SkillName>,
        tier: u32,
        threshold: u64,
        effect: EffectKind,
        magnitude: f64,
    ) -> Self {
        let code = code.into();
        Self {
            name: code.to_string(),
            code,
            skill: skill.into(),
            tier,
            threshold,
            prerequisites: Vec::new(),
            effect,
            magnitude,
            description: String::new(),
        }
    }

    /// Add a prerequisite talent code.
    pub fn requires(mut self, code: impl Into<TalentCode>) -> Self {
        self.prerequisites.push(code.into());
        self
    }
}

/// A talent a character has unlocked. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedTalent {
    /// The unlocked talent.
    pub code: TalentCode,
    /// Its skill track.
    pub skill: SkillName,
    /// When it was unlocked.
    pub unlocked_at: DateTime<Utc>,
}

/// All talents one character has unlocked, keyed by code.
///
/// Entries can be added but never removed or replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentBook {
    talents: BTreeMap<TalentCode, UnlockedTalent>,
}

impl TalentBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unlock. Returns false (and keeps the original record) if the
    /// talent was already unlocked.
    pub fn unlock(&mut self, talent: UnlockedTalent) -> bool {
        if self.talents.contains_key(&talent.code) {
            return false;
        }
        self.talents.insert(talent.code.clone(), talent);
        true
    }

    /// Returns true if the talent is unlocked.
    pub fn contains(&self, code: &TalentCode) -> bool {
        self.talents.contains_key(code)
    }

    /// Look up an unlock record.
    pub fn get(&self, code: &TalentCode) -> Option<&UnlockedTalent> {
        self.talents.get(code)
    }

    /// Unlocks belonging to one skill track.
    pub fn for_skill<'a>(&'a self, skill: &'a SkillName) -> impl Iterator<Item = &'a UnlockedTalent> {
        self.talents.values().filter(move |t| &t.skill == skill)
    }

    /// All unlocks, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &UnlockedTalent> {
        self.talents.values()
    }

    /// Number of unlocked talents.
    pub fn len(&self) -> usize {
        self.talents.len()
    }

    /// Whether nothing is unlocked yet.
    pub fn is_empty(&self) -> bool {
        self.talents.is_empty()
    }
}
