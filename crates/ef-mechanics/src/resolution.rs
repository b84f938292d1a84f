//! Rewards and consequences of a finished encounter.
//!
//! [`Resolver::resolve`] turns a terminal [`Encounter`] into a
//! [`Resolution`]: the character before and after, experience with its
//! bonuses, loot, level-ups, skill progress, talent unlocks, energy spent,
//! the history record, and the full narrative log. Loot is delivered and
//! history and events are published through [`Sinks`].

use chrono::Utc;
use ef_core::{Character, EffectKind, ItemId, TalentCode};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::dice::Dice;
use crate::effects::EffectSet;
use crate::encounter::{Encounter, EncounterStatus};
use crate::error::{EngineError, EngineResult};
use crate::events::GameEvent;
use crate::history::HistoryRecord;
use crate::ports::Sinks;
use crate::progression::{Ledger, Progress};
use crate::talents::TalentCatalog;

/// Experience awarded for a victory, by source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakdown {
    /// `floor(experience_reward × xp_multiplier)`.
    pub base: u64,
    /// Awarded when no damage was taken.
    pub perfect_bonus: u64,
    /// Awarded when the fight took few rounds.
    pub quick_bonus: u64,
}

impl XpBreakdown {
    /// Sum of all sources.
    pub fn total(&self) -> u64 {
        self.base + self.perfect_bonus + self.quick_bonus
    }
}

/// One loot table entry that dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    /// The item.
    pub item: ItemId,
    /// How many.
    pub quantity: u32,
}

/// Everything a finished encounter changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// How the encounter ended.
    pub status: EncounterStatus,
    /// The character as it entered resolution.
    pub before: Character,
    /// The character after damage, energy, experience, and level-ups.
    pub after: Character,
    /// Skill tracks and talents after the award.
    pub progress: Progress,
    /// Experience awarded.
    pub experience: XpBreakdown,
    /// Loot awarded.
    pub loot: Vec<LootDrop>,
    /// Every character level reached.
    pub levels_reached: Vec<u32>,
    /// Levels gained on the combat skill track.
    pub skill_levels_gained: u32,
    /// Talents newly unlocked.
    pub unlocked: Vec<TalentCode>,
    /// Energy deducted.
    pub energy_spent: u32,
    /// The history record that was published.
    pub record: HistoryRecord,
    /// Round-by-round narrative followed by the outcome.
    pub log: Vec<String>,
}

/// Resolves terminal encounters.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a EngineConfig,
    talents: &'a TalentCatalog,
}

impl<'a> Resolver<'a> {
    /// Create a resolver. Fails if the config is invalid.
    pub fn new(config: &'a EngineConfig, talents: &'a TalentCatalog) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config, talents })
    }

    /// Resolve a terminal encounter, consuming it.
    ///
    /// Fails with [`EngineError::EncounterOngoing`] if the encounter has not
    /// ended, [`EngineError::EncounterMismatch`] if `character` is not the
    /// one who fought, and propagates inventory failures. Loot is delivered
    /// in one batch; history and events are published only after it was
    /// accepted, so a failed resolution publishes nothing.
    pub fn resolve(
        &self,
        encounter: Encounter,
        character: &Character,
        progress: &Progress,
        dice: &mut dyn Dice,
        sinks: &mut Sinks<'_>,
    ) -> EngineResult<Resolution> {
        let status = encounter.status();
        if !status.is_terminal() {
            return Err(EngineError::EncounterOngoing);
        }
        if encounter.character_id() != character.id {
            return Err(EngineError::EncounterMismatch {
                expected: encounter.character_id(),
                found: character.id,
            });
        }

        let combat = &self.config.combat;
        let effects = encounter.effects();
        let mut after = character.clone();
        after.vitals.health = encounter.character_health().min(after.vitals.max_health);
        let mut log = encounter.log().to_vec();

        let cost = match status {
            EncounterStatus::Fled => combat.flee_energy_cost,
            _ => combat.encounter_energy_cost,
        };
        let energy_spent = after.vitals.spend_energy(effects.reduce_energy_cost(cost));

        let mut experience = XpBreakdown::default();
        let mut loot = Vec::new();
        let mut levels_reached = Vec::new();
        let mut skill_levels_gained = 0;
        let mut unlocked = Vec::new();
        let mut progress = progress.clone();

        match status {
            EncounterStatus::Victory => {
                experience = self.experience(&encounter);
                loot = self.roll_loot(&encounter, character.stats.luck, effects, dice);

                let ledger = Ledger::new(self.config)?;
                let award = ledger.award_character(&after, to_award(experience.total()));
                after = award.character;
                levels_reached = award.levels_reached;

                let training = ledger.train(
                    &progress,
                    self.talents,
                    &self.config.combat_skill,
                    to_award(experience.total()),
                );
                progress = training.progress;
                skill_levels_gained = training.award.levels_gained;
                unlocked = training.unlocked;

                log.push(format!(
                    "Victory! {} gains {} xp.",
                    after.name,
                    experience.total()
                ));
                if experience.perfect_bonus > 0 {
                    log.push(format!("Flawless: +{} xp.", experience.perfect_bonus));
                }
                if experience.quick_bonus > 0 {
                    log.push(format!("Swift: +{} xp.", experience.quick_bonus));
                }
                for drop in &loot {
                    log.push(format!("Looted {} x{}.", drop.item, drop.quantity));
                }
                for level in &levels_reached {
                    log.push(format!("{} reached level {level}!", after.name));
                }
                if let Some(track) = progress
                    .track(&self.config.combat_skill)
                    .filter(|_| skill_levels_gained > 0)
                {
                    log.push(format!("{} skill is now level {}.", track.skill, track.level));
                }
                for code in &unlocked {
                    let name = self
                        .talents
                        .get(code)
                        .map_or_else(|| code.to_string(), |node| node.name.clone());
                    log.push(format!("Talent unlocked: {name}."));
                }
            }
            EncounterStatus::Defeat => {
                let floor = combat.defeat_health.max(1).min(after.vitals.max_health);
                after.vitals.health = floor;
                log.push(format!(
                    "Defeat. {} is carried to safety with {floor} HP.",
                    after.name
                ));
            }
            EncounterStatus::Fled => {
                log.push(format!("{} got away.", after.name));
            }
            EncounterStatus::Ongoing => {}
        }
        if energy_spent > 0 {
            log.push(format!("Spent {energy_spent} energy."));
        }

        if !loot.is_empty() {
            sinks.inventory.add_items(character.id, &loot)?;
        }

        let record = HistoryRecord {
            character_id: character.id,
            opponent_id: encounter.opponent().id.clone(),
            result: status,
            rounds: encounter.round(),
            damage_dealt: encounter.damage_dealt(),
            damage_taken: encounter.damage_taken(),
            xp_gained: experience.total(),
            loot: loot.clone(),
            recorded_at: Utc::now(),
        };
        sinks.history.record(record.clone());

        if status == EncounterStatus::Victory {
            sinks.events.emit(GameEvent::MobDefeated {
                character_id: character.id,
                opponent_id: encounter.opponent().id.clone(),
            });
        }
        for &level in &levels_reached {
            sinks.events.emit(GameEvent::LevelReached {
                character_id: character.id,
                level,
            });
        }

        tracing::info!(
            character = %character.id,
            opponent = %encounter.opponent().id,
            result = %status,
            xp = experience.total(),
            rounds = encounter.round(),
            "encounter resolved"
        );

        Ok(Resolution {
            status,
            before: character.clone(),
            after,
            progress,
            experience,
            loot,
            levels_reached,
            skill_levels_gained,
            unlocked,
            energy_spent,
            record,
            log,
        })
    }

    fn experience(&self, encounter: &Encounter) -> XpBreakdown {
        let rewards = &self.config.rewards;
        let base =
            (encounter.opponent().experience_reward as f64 * rewards.xp_multiplier).floor() as u64;
        XpBreakdown {
            base,
            perfect_bonus: if encounter.damage_taken() == 0 {
                rewards.perfect_bonus
            } else {
                0
            },
            quick_bonus: if encounter.round() <= rewards.quick_round_limit {
                rewards.quick_bonus
            } else {
                0
            },
        }
    }

    /// Roll every loot table entry in item order.
    ///
    /// Per entry: the drop roll, then the luck roll and the loot-bonus roll
    /// that each widen the quantity range by one, then the quantity.
    fn roll_loot(
        &self,
        encounter: &Encounter,
        luck: u32,
        effects: &EffectSet,
        dice: &mut dyn Dice,
    ) -> Vec<LootDrop> {
        let factors = &self.config.loot;
        let luck = f64::from(luck);
        let mut drops = Vec::new();

        for (item, entry) in &encounter.opponent().loot {
            if !dice.chance(entry.chance + luck * factors.luck_chance_factor) {
                continue;
            }
            let mut max = entry.max;
            if dice.chance(luck * factors.luck_quantity_factor) {
                max = max.saturating_add(1);
            }
            if dice.chance(effects.get(EffectKind::LootBonusChance)) {
                max = max.saturating_add(1);
            }
            let quantity = dice.between(entry.min, max);
            if quantity > 0 {
                drops.push(LootDrop {
                    item: item.clone(),
                    quantity,
                });
            }
        }
        drops
    }
}

fn to_award(xp: u64) -> i64 {
    i64::try_from(xp).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::encounter::Action;
    use crate::events::EventQueue;
    use crate::history::HistoryLog;
    use crate::ports::{Inventory, MemoryInventory, NoDurability};
    use ef_core::{CharacterId, LootEntry, Opponent, Stats, TalentNode, Vitals};

    fn hero() -> Character {
        Character::new("Kael")
            .with_stats(Stats {
                strength: 0,
                agility: 10,
                intelligence: 10,
                luck: 0,
            })
            .with_vitals(Vitals::full(30, 20))
            .with_combat(20, 3)
    }

    fn rat() -> Opponent {
        Opponent::new("rat", "Giant Rat", 15, 3, 5, 10)
    }

    struct Harness {
        config: EngineConfig,
        talents: TalentCatalog,
        inventory: MemoryInventory,
        history: HistoryLog,
        events: EventQueue,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                config: EngineConfig::default(),
                talents: TalentCatalog::new([TalentNode::new(
                    "keen_eye",
                    "combat",
                    1,
                    20,
                    EffectKind::LootBonusChance,
                    0.1,
                )]),
                inventory: MemoryInventory::new(),
                history: HistoryLog::new(),
                events: EventQueue::new(),
            }
        }

        fn resolve(
            &mut self,
            encounter: Encounter,
            character: &Character,
            dice: &mut dyn Dice,
        ) -> EngineResult<Resolution> {
            let mut sinks = Sinks::new(&mut self.inventory, &mut self.history, &mut self.events);
            Resolver::new(&self.config, &self.talents)?.resolve(
                encounter,
                character,
                &Progress::new(),
                dice,
                &mut sinks,
            )
        }
    }

    fn fight(
        character: &Character,
        opponent: Opponent,
        effects: EffectSet,
        actions: &[Action],
        dice: &mut dyn Dice,
    ) -> Encounter {
        let mut enc =
            Encounter::start(character, opponent, effects, &EngineConfig::default()).unwrap();
        for &action in actions {
            enc.act(action, dice, &mut NoDurability).unwrap();
        }
        enc
    }

    #[test]
    fn perfect_slow_victory() {
        let kael = hero();
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(
            &kael,
            rat(),
            EffectSet::new(),
            &[
                Action::Defend,
                Action::Defend,
                Action::Defend,
                Action::Defend,
                Action::Attack,
            ],
            &mut dice,
        );
        assert_eq!(enc.status(), EncounterStatus::Victory);
        assert_eq!(enc.round(), 5);
        assert_eq!(enc.damage_taken(), 0);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        assert_eq!(res.experience.base, 15);
        assert_eq!(res.experience.perfect_bonus, 10);
        assert_eq!(res.experience.quick_bonus, 0);
        assert_eq!(res.experience.total(), 25);
        assert_eq!(res.after.experience, 25);
        assert_eq!(res.after.vitals.energy, 15);
        assert_eq!(res.energy_spent, 5);
        assert_eq!(res.unlocked, vec![TalentCode::new("keen_eye")]);
        assert_eq!(res.progress.track(&"combat".into()).unwrap().total_experience, 25);
    }

    #[test]
    fn quick_victory_with_damage_taken() {
        let kael = hero();
        let mut dice = ScriptedDice::new().with_chances([false, true]);
        let enc = fight(
            &kael,
            rat(),
            EffectSet::new(),
            &[Action::Attack, Action::Attack],
            &mut dice,
        );
        assert_eq!(enc.status(), EncounterStatus::Victory);
        assert_eq!(enc.damage_taken(), 1);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        assert_eq!(res.experience.perfect_bonus, 0);
        assert_eq!(res.experience.quick_bonus, 5);
        assert_eq!(res.experience.total(), 20);
        assert_eq!(res.after.vitals.health, 29);
    }

    #[test]
    fn victory_delivers_loot_and_events() {
        let kael = hero();
        let rat = rat().with_loot("rat_tail", LootEntry::new(1, 3, 0.5));
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat, EffectSet::new(), &[Action::Attack], &mut dice);

        let mut h = Harness::new();
        let mut loot_dice = ScriptedDice::new().with_chances([true]).with_values([2]);
        let res = h.resolve(enc, &kael, &mut loot_dice).unwrap();

        let tail = ItemId::new("rat_tail");
        assert_eq!(
            res.loot,
            vec![LootDrop {
                item: tail.clone(),
                quantity: 2
            }]
        );
        assert_eq!(h.inventory.quantity(kael.id, &tail), 2);
        assert_eq!(h.history.len(), 1);
        assert_eq!(h.history.records()[0].loot, res.loot);
        let events = h.events.drain();
        assert!(matches!(events[0], GameEvent::MobDefeated { .. }));
        assert!(res.log.iter().any(|l| l == "Looted rat_tail x2."));
    }

    #[test]
    fn loot_bonus_widens_quantity() {
        let kael = hero();
        let rat = rat().with_loot("rat_tail", LootEntry::new(1, 3, 0.5));
        let mut effects = EffectSet::new();
        effects.insert_max(EffectKind::LootBonusChance, 1.0);
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat, effects, &[Action::Attack], &mut dice);

        let mut h = Harness::new();
        let mut loot_dice = ScriptedDice::new().with_chances([true]).with_values([9]);
        let res = h.resolve(enc, &kael, &mut loot_dice).unwrap();
        assert_eq!(res.loot[0].quantity, 4);
    }

    #[test]
    fn failed_drop_roll_yields_nothing() {
        let kael = hero();
        let rat = rat().with_loot("rat_tail", LootEntry::new(1, 3, 0.5));
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat, EffectSet::new(), &[Action::Attack], &mut dice);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        assert!(res.loot.is_empty());
        assert!(h.inventory.items_of(kael.id).is_empty());
    }

    #[test]
    fn victory_levels_up_and_restores() {
        let mut kael = hero();
        kael.vitals.health = 10;
        let boss = Opponent::new("ogre", "Ogre", 15, 3, 5, 100);
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, boss, EffectSet::new(), &[Action::Attack], &mut dice);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        // 150 base + 10 perfect + 5 quick
        assert_eq!(res.experience.total(), 165);
        assert_eq!(res.levels_reached, vec![2]);
        assert_eq!(res.after.level, 2);
        assert_eq!(res.after.vitals.max_health, 40);
        assert_eq!(res.after.vitals.health, 40);
        assert_eq!(res.after.vitals.energy, 25);
        assert_eq!(res.skill_levels_gained, 1);
        let events = h.events.drain();
        assert!(events.contains(&GameEvent::LevelReached {
            character_id: kael.id,
            level: 2
        }));
    }

    #[test]
    fn defeat_leaves_minimum_health() {
        let mut kael = hero();
        kael.vitals.health = 1;
        let brute = Opponent::new("brute", "Brute", 50, 10, 5, 40)
            .with_loot("club", LootEntry::new(1, 1, 1.0));
        let enc = fight(
            &kael,
            brute,
            EffectSet::new(),
            &[Action::Attack],
            &mut ScriptedDice::new(),
        );
        assert_eq!(enc.status(), EncounterStatus::Defeat);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        assert_eq!(res.after.vitals.health, 1);
        assert_eq!(res.after.vitals.energy, 15);
        assert_eq!(res.experience.total(), 0);
        assert!(res.loot.is_empty());
        assert_eq!(res.after.experience, 0);
        assert_eq!(h.history.records()[0].result, EncounterStatus::Defeat);
        assert!(h.events.is_empty());
    }

    #[test]
    fn fled_costs_minor_energy() {
        let kael = hero();
        let mut dice = ScriptedDice::new().with_chances([false, true]);
        let enc = fight(
            &kael,
            rat(),
            EffectSet::new(),
            &[Action::Flee, Action::Flee],
            &mut dice,
        );
        assert_eq!(enc.status(), EncounterStatus::Fled);

        let mut h = Harness::new();
        let res = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap();
        assert_eq!(res.energy_spent, 2);
        assert_eq!(res.after.vitals.health, 29);
        assert_eq!(res.experience.total(), 0);
        assert_eq!(h.history.records()[0].rounds, 2);
    }

    #[test]
    fn ongoing_cannot_resolve() {
        let kael = hero();
        let enc = fight(&kael, rat(), EffectSet::new(), &[], &mut ScriptedDice::new());
        let mut h = Harness::new();
        let err = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap_err();
        assert!(matches!(err, EngineError::EncounterOngoing));
        assert!(h.history.is_empty());
    }

    #[test]
    fn wrong_character_rejected() {
        let kael = hero();
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat(), EffectSet::new(), &[Action::Flee], &mut dice);
        let mut h = Harness::new();
        let err = h
            .resolve(enc, &Character::new("Impostor"), &mut ScriptedDice::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::EncounterMismatch { .. }));
    }

    struct FullBag;

    impl Inventory for FullBag {
        fn add_items(&mut self, _: CharacterId, _: &[LootDrop]) -> EngineResult<()> {
            Err(EngineError::Inventory("bag is full".into()))
        }
    }

    #[test]
    fn inventory_failure_propagates_before_history() {
        let kael = hero();
        let rat = rat().with_loot("rat_tail", LootEntry::new(1, 1, 1.0));
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat, EffectSet::new(), &[Action::Attack], &mut dice);

        let config = EngineConfig::default();
        let talents = TalentCatalog::new(Vec::<TalentNode>::new());
        let mut history = HistoryLog::new();
        let mut events = EventQueue::new();
        let mut bag = FullBag;
        let mut sinks = Sinks::new(&mut bag, &mut history, &mut events);
        let err = Resolver::new(&config, &talents)
            .unwrap()
            .resolve(enc, &kael, &Progress::new(), &mut ScriptedDice::new(), &mut sinks)
            .unwrap_err();
        assert!(matches!(err, EngineError::Inventory(_)));
        assert!(history.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn rejected_loot_batch_delivers_nothing() {
        let kael = hero();
        let rat = rat()
            .with_loot("bone", LootEntry::new(1, 1, 1.0))
            .with_loot("tail", LootEntry::new(1, 1, 1.0));
        let mut dice = ScriptedDice::new().with_chances([true]);
        let enc = fight(&kael, rat, EffectSet::new(), &[Action::Attack], &mut dice);

        let mut h = Harness::new();
        h.inventory = MemoryInventory::with_slots(1);
        let err = h.resolve(enc, &kael, &mut ScriptedDice::new()).unwrap_err();
        assert!(matches!(err, EngineError::Inventory(_)));
        assert!(h.inventory.items_of(kael.id).is_empty());
        assert!(h.history.is_empty());
        assert!(h.events.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.level_up.stat_interval = 0;
        let talents = TalentCatalog::new(Vec::<TalentNode>::new());
        assert!(matches!(
            Resolver::new(&config, &talents),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
