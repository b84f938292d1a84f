//! Combat formulas.

use crate::config::CombatConfig;

/// Chance to land a strike.
///
/// `clamp(base_accuracy + (agility − 10) × agility_factor, min, max)`, then
/// multiplied by the heavy penalty for heavy attacks.
pub fn hit_chance(combat: &CombatConfig, agility: u32, heavy: bool) -> f64 {
    let raw = combat.base_accuracy + (f64::from(agility) - 10.0) * combat.agility_factor;
    let chance = raw.clamp(combat.min_hit_chance, combat.max_hit_chance);
    if heavy {
        chance * combat.heavy_accuracy_penalty
    } else {
        chance
    }
}

/// Chance that a landed strike is critical: `luck × crit_factor`.
pub fn crit_chance(combat: &CombatConfig, luck: u32) -> f64 {
    (f64::from(luck) * combat.crit_factor).clamp(0.0, 1.0)
}

/// Chance to escape: `flee_base_chance + agility × flee_agility_factor`.
pub fn flee_chance(combat: &CombatConfig, agility: u32) -> f64 {
    (combat.flee_base_chance + f64::from(agility) * combat.flee_agility_factor).clamp(0.0, 1.0)
}

/// `max(1, attack − defense)`.
pub fn base_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(1)
}

/// Damage of a landed strike.
///
/// `floor(base × heavy_multiplier × crit_multiplier) + floor(strength / 5)`.
/// Pass 1.0 for multipliers that do not apply.
pub fn strike_damage(
    attack: u32,
    defense: u32,
    strength: u32,
    heavy_multiplier: f64,
    crit_multiplier: f64,
) -> u32 {
    let scaled = (f64::from(base_damage(attack, defense)) * heavy_multiplier * crit_multiplier).floor();
    (scaled as u32).saturating_add(strength / 5)
}

/// The opponent's counter-attack, halved (rounding down) when defending.
pub fn counter_damage(attack: u32, defense: u32, strength: u32, defending: bool) -> u32 {
    let damage = base_damage(attack, defense).saturating_add(strength / 5);
    if defending { damage / 2 } else { damage }
}
