//! Character level-ups.

use ef_core::Character;

use super::Ledger;

/// Result of awarding experience to a character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterAward {
    /// The character after the award and any level-ups.
    pub character: Character,
    /// Every level reached by this award, in order.
    pub levels_reached: Vec<u32>,
}

impl CharacterAward {
    /// Number of levels gained.
    pub fn levels_gained(&self) -> u32 {
        self.levels_reached.len() as u32
    }
}

impl Ledger<'_> {
    /// Add experience to a character and apply every level-up it earns.
    ///
    /// Each level raises max health and max energy and fully restores both.
    /// Every `stat_interval`-th level also raises strength, agility,
    /// intelligence, and luck.
    pub fn award_character(&self, character: &Character, amount: i64) -> CharacterAward {
        let mut character = character.clone();
        let amount = u64::try_from(amount).unwrap_or(0);
        character.experience = character.experience.saturating_add(amount);

        let curve = &self.config.xp_curve;
        let bonuses = &self.config.level_up;
        let mut levels_reached = Vec::new();

        while character.experience >= curve.xp_for_level(character.level + 1) {
            if levels_reached.len() as u32 >= self.config.max_levels_per_award {
                tracing::warn!(
                    character = %character.id,
                    level = character.level,
                    "character level-up loop stopped at the per-award bound"
                );
                break;
            }
            character.level += 1;

            let vitals = &mut character.vitals;
            vitals.max_health = vitals.max_health.saturating_add(bonuses.max_health);
            vitals.max_energy = vitals.max_energy.saturating_add(bonuses.max_energy);
            vitals.restore();

            if character.level % bonuses.stat_interval == 0 {
                let stats = &mut character.stats;
                stats.strength = stats.strength.saturating_add(bonuses.primary_stats);
                stats.agility = stats.agility.saturating_add(bonuses.primary_stats);
                stats.intelligence = stats.intelligence.saturating_add(bonuses.primary_stats);
                stats.luck = stats.luck.saturating_add(bonuses.luck);
            }

            tracing::info!(character = %character.name, level = character.level, "level up");
            levels_reached.push(character.level);
        }

        CharacterAward {
            character,
            levels_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use ef_core::{Stats, Vitals};

    fn hero() -> Character {
        Character::new("Kael").with_vitals(Vitals {
            health: 12,
            max_health: 100,
            energy: 3,
            max_energy: 50,
        })
    }

    #[test]
    fn below_threshold_only_adds_experience() {
        let cfg = EngineConfig::default();
        let award = Ledger::new(&cfg).unwrap().award_character(&hero(), 99);
        assert!(award.levels_reached.is_empty());
        assert_eq!(award.character.experience, 99);
        assert_eq!(award.character.vitals.health, 12);
    }

    #[test]
    fn single_level_restores_and_grows() {
        let cfg = EngineConfig::default();
        let award = Ledger::new(&cfg).unwrap().award_character(&hero(), 100);
        assert_eq!(award.levels_reached, vec![2]);
        let v = award.character.vitals;
        assert_eq!(v.max_health, 110);
        assert_eq!(v.max_energy, 55);
        assert_eq!(v.health, 110);
        assert_eq!(v.energy, 55);
        assert_eq!(award.character.stats, Stats::default());
    }

    #[test]
    fn multi_level_grants_fifth_level_stats() {
        let cfg = EngineConfig::default();
        // xp_for_level(5) = 100 * 4^1.5 = 800
        let award = Ledger::new(&cfg).unwrap().award_character(&hero(), 800);
        assert_eq!(award.levels_reached, vec![2, 3, 4, 5]);
        assert_eq!(award.levels_gained(), 4);
        let stats = award.character.stats;
        let base = Stats::default();
        assert_eq!(stats.strength, base.strength + 2);
        assert_eq!(stats.agility, base.agility + 2);
        assert_eq!(stats.intelligence, base.intelligence + 2);
        assert_eq!(stats.luck, base.luck + 1);
        assert_eq!(award.character.vitals.max_health, 140);
    }

    #[test]
    fn negative_award_is_noop() {
        let cfg = EngineConfig::default();
        let start = hero();
        let award = Ledger::new(&cfg).unwrap().award_character(&start, -500);
        assert_eq!(award.character, start);
        assert!(award.levels_reached.is_empty());
    }

    #[test]
    fn zero_stat_interval_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.level_up.stat_interval = 0;
        assert!(matches!(
            Ledger::new(&cfg),
            Err(crate::error::EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn huge_award_is_bounded() {
        let mut cfg = EngineConfig::default();
        cfg.max_levels_per_award = 3;
        let award = Ledger::new(&cfg).unwrap().award_character(&hero(), u32::MAX.into());
        assert_eq!(award.levels_gained(), 3);
    }
}
