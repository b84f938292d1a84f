//! Effect aggregation over unlocked talents.
//!
//! For each effect kind, the strongest magnitude among a character's
//! unlocked talents on a skill track wins. Magnitudes of the same kind do
//! not add up.

use std::collections::BTreeMap;

use ef_core::{EffectKind, SkillName, TalentBook};
use serde::{Deserialize, Serialize};

use crate::talents::TalentCatalog;

/// Resolved effects for one character on one skill track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSet {
    values: BTreeMap<EffectKind, f64>,
}

impl EffectSet {
    /// Create an empty effect set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a magnitude, keeping the larger of it and any existing value.
    pub fn insert_max(&mut self, kind: EffectKind, magnitude: f64) {
        self.values
            .entry(kind)
            .and_modify(|m| *m = m.max(magnitude))
            .or_insert(magnitude);
    }

    /// The magnitude of a kind, if any talent grants it.
    pub fn magnitude(&self, kind: EffectKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    /// The magnitude of a kind, or 0 when absent.
    pub fn get(&self, kind: EffectKind) -> f64 {
        self.magnitude(kind).unwrap_or(0.0)
    }

    /// All `(kind, magnitude)` pairs, ordered by kind.
    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of distinct kinds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no effects are active.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply [`EffectKind::EnergyCostReduction`] to an energy cost.
    pub fn reduce_energy_cost(&self, cost: u32) -> u32 {
        let reduction = self.get(EffectKind::EnergyCostReduction).clamp(0.0, 1.0);
        (f64::from(cost) * (1.0 - reduction)).round() as u32
    }
}

/// Aggregate a character's unlocked talents on `skill` into an effect set.
pub fn active_effects(catalog: &TalentCatalog, book: &TalentBook, skill: &SkillName) -> EffectSet {
    let mut set = EffectSet::new();
    for unlocked in book.for_skill(skill) {
        match catalog.get(&unlocked.code) {
            Some(node) => set.insert_max(node.effect, node.magnitude),
            None => {
                tracing::warn!(talent = %unlocked.code, "unlocked talent missing from catalog");
            }
        }
    }
    set
}
