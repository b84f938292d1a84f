//! Request-scoped engine façade.
//!
//! `Session` wires the engine to a [`Persistence`] store: it loads the
//! character, opponent, and progress for an encounter, allows at most one
//! active encounter per character, and writes results back on conclusion.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use ef_core::{CharacterId, OpponentId, SkillName};

use crate::config::EngineConfig;
use crate::dice::Dice;
use crate::effects::{EffectSet, active_effects};
use crate::encounter::{Action, Encounter, RoundReport};
use crate::error::{EngineError, EngineResult};
use crate::events::GameEvent;
use crate::ports::{Durability, EventSink, Persistence, Sinks};
use crate::progression::{Ledger, Training};
use crate::resolution::{Resolution, Resolver};
use crate::talents::TalentCatalog;

/// The engine bound to a store, a talent catalog, and a dice source.
pub struct Session<P: Persistence> {
    config: EngineConfig,
    talents: TalentCatalog,
    store: P,
    dice: Box<dyn Dice>,
    active: HashSet<CharacterId>,
}

impl<P: Persistence> Session<P> {
    /// Create a session with seeded dice. Fails if the config is invalid.
    pub fn new(
        config: EngineConfig,
        talents: TalentCatalog,
        store: P,
        seed: u64,
    ) -> EngineResult<Self> {
        config.validate()?;
        for problem in talents.inconsistencies() {
            tracing::warn!("{problem}");
        }
        Ok(Self {
            config,
            talents,
            store,
            dice: Box::new(StdRng::seed_from_u64(seed)),
            active: HashSet::new(),
        })
    }

    /// Replace the dice source.
    pub fn with_dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the talent catalog.
    pub fn talents(&self) -> &TalentCatalog {
        &self.talents
    }

    /// Get the store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Get the store mutably.
    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Whether the character has an encounter running.
    pub fn is_engaged(&self, character: CharacterId) -> bool {
        self.active.contains(&character)
    }

    /// Start an encounter for a stored character against a stored opponent.
    ///
    /// Fails with [`EngineError::EncounterInProgress`] if the character is
    /// already fighting.
    pub fn start_encounter(
        &mut self,
        character_id: CharacterId,
        opponent_id: &OpponentId,
    ) -> EngineResult<Encounter> {
        if self.active.contains(&character_id) {
            return Err(EngineError::EncounterInProgress(character_id));
        }
        let character = self.store.load_character(character_id)?;
        let opponent = self.store.load_opponent(opponent_id)?;
        let effects = self.active_effects(character_id, &self.config.combat_skill)?;

        let encounter = Encounter::start(&character, opponent, effects, &self.config)?;
        self.active.insert(character_id);
        Ok(encounter)
    }

    /// Play one round with the session's dice.
    ///
    /// Fails with [`EngineError::EncounterNotActive`] if the encounter's
    /// character is not engaged in this session.
    pub fn act(
        &mut self,
        encounter: &mut Encounter,
        action: Action,
        durability: &mut dyn Durability,
    ) -> EngineResult<RoundReport> {
        self.ensure_engaged(encounter.character_id())?;
        encounter.act(action, self.dice.as_mut(), durability)
    }

    /// Resolve a finished encounter and write the character and progress back.
    ///
    /// The encounter is consumed and the character released whether or not
    /// resolution succeeds. On failure nothing is stored. Fails with
    /// [`EngineError::EncounterNotActive`] without touching the session if
    /// the character is not engaged here.
    pub fn conclude(
        &mut self,
        encounter: Encounter,
        sinks: &mut Sinks<'_>,
    ) -> EngineResult<Resolution> {
        let character_id = encounter.character_id();
        self.ensure_engaged(character_id)?;
        let result = self.resolve_and_store(encounter, sinks);
        self.active.remove(&character_id);
        result
    }

    fn resolve_and_store(
        &mut self,
        encounter: Encounter,
        sinks: &mut Sinks<'_>,
    ) -> EngineResult<Resolution> {
        let character_id = encounter.character_id();
        let character = self.store.load_character(character_id)?;
        let progress = self.store.load_progress(character_id)?;

        let resolution = Resolver::new(&self.config, &self.talents)?.resolve(
            encounter,
            &character,
            &progress,
            self.dice.as_mut(),
            sinks,
        )?;

        self.store.save_character(&resolution.after)?;
        self.store.save_progress(character_id, &resolution.progress)?;
        Ok(resolution)
    }

    fn ensure_engaged(&self, character: CharacterId) -> EngineResult<()> {
        if self.active.contains(&character) {
            Ok(())
        } else {
            Err(EngineError::EncounterNotActive(character))
        }
    }

    /// Abandon a character's encounter without resolving it.
    pub fn release(&mut self, character: CharacterId) -> bool {
        self.active.remove(&character)
    }

    /// Award experience to one of a character's skills and store the result.
    pub fn award_skill_experience(
        &mut self,
        character_id: CharacterId,
        skill: &SkillName,
        amount: i64,
    ) -> EngineResult<Training> {
        self.store.load_character(character_id)?;
        let progress = self.store.load_progress(character_id)?;
        let training = Ledger::new(&self.config)?.train(&progress, &self.talents, skill, amount);
        self.store.save_progress(character_id, &training.progress)?;
        Ok(training)
    }

    /// Award crafting experience and publish a `CraftCompleted` event.
    pub fn complete_craft(
        &mut self,
        character_id: CharacterId,
        skill: &SkillName,
        recipe: &str,
        amount: i64,
        events: &mut dyn EventSink,
    ) -> EngineResult<Training> {
        let training = self.award_skill_experience(character_id, skill, amount)?;
        events.emit(GameEvent::CraftCompleted {
            character_id,
            skill: skill.clone(),
            recipe: recipe.to_string(),
        });
        Ok(training)
    }

    /// The effect set a character's unlocked talents on `skill` provide.
    pub fn active_effects(
        &self,
        character_id: CharacterId,
        skill: &SkillName,
    ) -> EngineResult<EffectSet> {
        let progress = self.store.load_progress(character_id)?;
        Ok(active_effects(&self.talents, &progress.talents, skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::dice::ScriptedDice;
    use crate::encounter::EncounterStatus;
    use crate::events::EventQueue;
    use crate::history::HistoryLog;
    use crate::ports::{MemoryInventory, MemoryStore, NoDurability};
    use ef_core::{Character, EffectKind, Opponent, Stats, TalentCode, TalentNode, Vitals};

    fn setup() -> (Session<MemoryStore>, CharacterId) {
        let kael = Character::new("Kael")
            .with_stats(Stats {
                strength: 0,
                luck: 0,
                ..Stats::default()
            })
            .with_vitals(Vitals::full(30, 20))
            .with_combat(20, 3);
        let id = kael.id;
        let mut store = MemoryStore::new();
        store.insert_character(kael);
        store.insert_opponent(Opponent::new("rat", "Giant Rat", 15, 3, 5, 10));

        let talents = TalentCatalog::new([
            TalentNode::new("keen_eye", "combat", 1, 20, EffectKind::LootBonusChance, 0.1),
            TalentNode::new("thrifty", "smithing", 1, 50, EffectKind::MaterialCostReduction, 0.1),
        ]);
        let session = Session::new(EngineConfig::default(), talents, store, 7).unwrap();
        (session, id)
    }

    #[test]
    fn invalid_config_rejected() {
        let config = EngineConfig::default().with_combat(CombatConfig {
            min_hit_chance: 0.9,
            max_hit_chance: 0.5,
            ..CombatConfig::default()
        });
        let talents = TalentCatalog::new(Vec::<TalentNode>::new());
        let result = Session::new(config, talents, MemoryStore::new(), 1);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn second_concurrent_start_rejected() {
        let (mut session, id) = setup();
        let _first = session.start_encounter(id, &"rat".into()).unwrap();
        assert!(session.is_engaged(id));
        let err = session.start_encounter(id, &"rat".into()).unwrap_err();
        assert!(matches!(err, EngineError::EncounterInProgress(c) if c == id));

        assert!(session.release(id));
        assert!(session.start_encounter(id, &"rat".into()).is_ok());
    }

    #[test]
    fn unknown_ids_fail() {
        let (mut session, id) = setup();
        assert!(matches!(
            session.start_encounter(id, &"dragon".into()),
            Err(EngineError::OpponentNotFound(_))
        ));
        assert!(matches!(
            session.start_encounter(CharacterId::new(), &"rat".into()),
            Err(EngineError::CharacterNotFound(_))
        ));
        assert!(!session.is_engaged(id));
    }

    #[test]
    fn full_encounter_writes_back() {
        let (session, id) = setup();
        let mut session = session.with_dice(ScriptedDice::new().with_chances([true]));
        let mut enc = session.start_encounter(id, &"rat".into()).unwrap();
        session
            .act(&mut enc, Action::Attack, &mut NoDurability)
            .unwrap();
        assert_eq!(enc.status(), EncounterStatus::Victory);

        let mut inventory = MemoryInventory::new();
        let mut history = HistoryLog::new();
        let mut events = EventQueue::new();
        let mut sinks = Sinks::new(&mut inventory, &mut history, &mut events);
        let res = session.conclude(enc, &mut sinks).unwrap();

        assert_eq!(res.experience.total(), 30);
        assert!(!session.is_engaged(id));
        let stored = session.store().load_character(id).unwrap();
        assert_eq!(stored.experience, 30);
        assert_eq!(stored.vitals.energy, 15);

        let effects = session.active_effects(id, &"combat".into()).unwrap();
        assert_eq!(effects.magnitude(EffectKind::LootBonusChance), Some(0.1));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn conclude_ongoing_discards_without_writing() {
        let (mut session, id) = setup();
        let enc = session.start_encounter(id, &"rat".into()).unwrap();
        let mut inventory = MemoryInventory::new();
        let mut history = HistoryLog::new();
        let mut events = EventQueue::new();
        let mut sinks = Sinks::new(&mut inventory, &mut history, &mut events);
        assert!(matches!(
            session.conclude(enc, &mut sinks),
            Err(EngineError::EncounterOngoing)
        ));
        assert!(!session.is_engaged(id));
        assert!(history.is_empty());
        assert_eq!(session.store().load_character(id).unwrap().vitals.energy, 20);
    }

    #[test]
    fn encounter_resolves_only_once() {
        let (session, id) = setup();
        let mut session = session.with_dice(ScriptedDice::new().with_chances([true]));
        let mut enc = session.start_encounter(id, &"rat".into()).unwrap();
        session
            .act(&mut enc, Action::Attack, &mut NoDurability)
            .unwrap();
        let replay = enc.clone();

        let mut inventory = MemoryInventory::new();
        let mut history = HistoryLog::new();
        let mut events = EventQueue::new();
        let mut sinks = Sinks::new(&mut inventory, &mut history, &mut events);
        session.conclude(enc, &mut sinks).unwrap();
        let err = session.conclude(replay, &mut sinks).unwrap_err();
        assert!(matches!(err, EngineError::EncounterNotActive(c) if c == id));

        let stored = session.store().load_character(id).unwrap();
        assert_eq!(stored.experience, 30);
        assert_eq!(stored.vitals.energy, 15);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn released_encounter_cannot_act_or_conclude() {
        let (mut session, id) = setup();
        let mut enc = session.start_encounter(id, &"rat".into()).unwrap();
        assert!(session.release(id));

        let err = session
            .act(&mut enc, Action::Defend, &mut NoDurability)
            .unwrap_err();
        assert!(matches!(err, EngineError::EncounterNotActive(_)));
        assert_eq!(enc.round(), 0);

        let mut inventory = MemoryInventory::new();
        let mut history = HistoryLog::new();
        let mut events = EventQueue::new();
        let mut sinks = Sinks::new(&mut inventory, &mut history, &mut events);
        let err = session.conclude(enc, &mut sinks).unwrap_err();
        assert!(matches!(err, EngineError::EncounterNotActive(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn foreign_encounter_is_rejected() {
        let (mut session, id) = setup();
        let kael = session.store().load_character(id).unwrap();
        let rat = session.store().load_opponent(&"rat".into()).unwrap();
        let mut enc =
            Encounter::start(&kael, rat, EffectSet::new(), session.config()).unwrap();
        let err = session
            .act(&mut enc, Action::Attack, &mut NoDurability)
            .unwrap_err();
        assert!(matches!(err, EngineError::EncounterNotActive(c) if c == id));
    }

    #[test]
    fn crafting_awards_skill_and_emits_event() {
        let (mut session, id) = setup();
        let mut events = EventQueue::new();
        let training = session
            .complete_craft(id, &"smithing".into(), "iron_sword", 60, &mut events)
            .unwrap();
        assert_eq!(training.unlocked, vec![TalentCode::new("thrifty")]);
        assert_eq!(events.len(), 1);

        let effects = session.active_effects(id, &"smithing".into()).unwrap();
        assert_eq!(effects.get(EffectKind::MaterialCostReduction), 0.1);
        let progress = session.store().load_progress(id).unwrap();
        assert_eq!(progress.track(&"smithing".into()).unwrap().total_experience, 60);
    }

    #[test]
    fn skill_award_for_unknown_character_fails() {
        let (mut session, _) = setup();
        let err = session
            .award_skill_experience(CharacterId::new(), &"mining".into(), 10)
            .unwrap_err();
        assert!(matches!(err, EngineError::CharacterNotFound(_)));
    }
}
