//! Injectable randomness.
//!
//! Every roll the engine makes goes through [`Dice`]. Any seeded
//! [`rand::Rng`] (typically `StdRng`) is a `Dice`, which makes encounters
//! replayable; [`ScriptedDice`] replays a fixed list of outcomes so a
//! specific hit, miss, or drop can be forced.
//!
//! Rolls at certainty (`p <= 0` or `p >= 1`) and single-value ranges are
//! decided without consuming randomness.

use std::collections::VecDeque;

use rand::Rng;

/// A source of random outcomes.
pub trait Dice {
    /// Returns true with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform integer in `[min, max]` (inclusive). Returns `min` if `max <= min`.
    fn between(&mut self, min: u32, max: u32) -> u32;
}

impl<R: Rng> Dice for R {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.random::<f64>() < probability
    }

    fn between(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.random_range(min..=max)
    }
}

/// Dice that replay scripted outcomes in order.
///
/// When a script runs dry, `chance` returns false and `between` returns the
/// minimum.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    chances: VecDeque<bool>,
    values: VecDeque<u32>,
}

impl ScriptedDice {
    /// Create dice with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for `chance` rolls.
    pub fn with_chances(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(outcomes);
        self
    }

    /// Queue results for `between` rolls. Each is clamped to the requested range.
    pub fn with_values(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.values.extend(values);
        self
    }

    /// Number of `chance` outcomes not yet consumed.
    pub fn remaining_chances(&self) -> usize {
        self.chances.len()
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.chances.pop_front().unwrap_or(false)
    }

    fn between(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.values
            .pop_front()
            .map_or(min, |v| v.clamp(min, max))
    }
}
