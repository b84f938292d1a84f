//! Encounter state machine.
//!
//! An [`Encounter`] pits one character against one opponent and resolves
//! round by round until it reaches a terminal [`EncounterStatus`]. A round
//! is atomic: it either applies completely or, when rejected, not at all.

pub mod action;
pub mod formula;

pub use action::Action;

use std::fmt;

use ef_core::{Character, CharacterId, EffectKind, Opponent, Stats};
use serde::{Deserialize, Serialize};

use crate::config::{CombatConfig, EngineConfig};
use crate::dice::Dice;
use crate::effects::EffectSet;
use crate::error::{EngineError, EngineResult};
use crate::ports::Durability;

/// Where an encounter stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    /// Rounds can still be played.
    Ongoing,
    /// The opponent was brought to 0 health.
    Victory,
    /// The character was brought to 0 health.
    Defeat,
    /// The character escaped.
    Fled,
}

impl EncounterStatus {
    /// Whether no further rounds are possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ongoing => "ongoing",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Fled => "fled",
        };
        f.write_str(s)
    }
}

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// The round number (1-based).
    pub round: u32,
    /// The action the character took.
    pub action: Action,
    /// Whether the character's strike landed.
    pub hit: bool,
    /// Whether the strike was critical.
    pub critical: bool,
    /// Damage dealt to the opponent this round.
    pub damage_dealt: u32,
    /// Damage taken from the opponent this round.
    pub damage_taken: u32,
    /// Whether the character escaped this round.
    pub fled: bool,
    /// Whether the equipped tool broke this round.
    pub tool_broke: bool,
    /// Status after the round.
    pub status: EncounterStatus,
    /// Narrative lines for this round.
    pub lines: Vec<String>,
}

/// One active confrontation between a character and an opponent.
#[derive(Debug, Clone)]
pub struct Encounter {
    character_id: CharacterId,
    character_name: String,
    stats: Stats,
    attack: u32,
    defense: u32,
    character_health: u32,
    opponent: Opponent,
    opponent_health: u32,
    round: u32,
    damage_dealt: u64,
    damage_taken: u64,
    log: Vec<String>,
    status: EncounterStatus,
    effects: EffectSet,
    combat: CombatConfig,
}

impl Encounter {
    /// Start an encounter.
    ///
    /// Fails with [`EngineError::InvalidConfig`] if the config does not
    /// validate, and with [`EngineError::InsufficientEnergy`] if the character
    /// cannot cover the encounter's energy cost after energy-cost reductions.
    /// The cost itself is deducted at resolution.
    pub fn start(
        character: &Character,
        opponent: Opponent,
        effects: EffectSet,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        let required = effects.reduce_energy_cost(config.combat.encounter_energy_cost);
        if character.vitals.energy < required {
            return Err(EngineError::InsufficientEnergy {
                required,
                available: character.vitals.energy,
            });
        }

        tracing::info!(
            character = %character.id,
            opponent = %opponent.id,
            "encounter started"
        );

        let opening = format!(
            "{} engages {} (HP {}).",
            character.name, opponent.name, opponent.health
        );
        Ok(Self {
            character_id: character.id,
            character_name: character.name.clone(),
            stats: character.stats,
            attack: character.attack,
            defense: character.defense,
            character_health: character.vitals.health,
            opponent_health: opponent.health,
            opponent,
            round: 0,
            damage_dealt: 0,
            damage_taken: 0,
            log: vec![opening],
            status: EncounterStatus::Ongoing,
            effects,
            combat: config.combat.clone(),
        })
    }

    /// Parse an action tag and play a round with it.
    pub fn act_str(
        &mut self,
        action: &str,
        dice: &mut dyn Dice,
        durability: &mut dyn Durability,
    ) -> EngineResult<RoundReport> {
        let action: Action = action.parse()?;
        self.act(action, dice, durability)
    }

    /// Play one round.
    ///
    /// Fails with [`EngineError::EncounterClosed`] once the encounter is
    /// terminal, leaving it untouched.
    pub fn act(
        &mut self,
        action: Action,
        dice: &mut dyn Dice,
        durability: &mut dyn Durability,
    ) -> EngineResult<RoundReport> {
        if self.status.is_terminal() {
            return Err(EngineError::EncounterClosed {
                status: self.status,
            });
        }

        self.round += 1;
        let mut report = RoundReport {
            round: self.round,
            action,
            hit: false,
            critical: false,
            damage_dealt: 0,
            damage_taken: 0,
            fled: false,
            tool_broke: false,
            status: EncounterStatus::Ongoing,
            lines: Vec::new(),
        };

        match action {
            Action::Flee => self.attempt_flee(dice, &mut report),
            Action::Attack | Action::HeavyAttack => {
                self.strike(action, dice, durability, &mut report);
            }
            Action::Defend => report
                .lines
                .push(format!("{} takes a defensive stance.", self.character_name)),
        }

        if !report.fled && self.opponent_health > 0 {
            self.counter_attack(action == Action::Defend, &mut report);
        }

        self.status = if self.opponent_health == 0 {
            EncounterStatus::Victory
        } else if self.character_health == 0 {
            EncounterStatus::Defeat
        } else if report.fled {
            EncounterStatus::Fled
        } else {
            EncounterStatus::Ongoing
        };
        report.status = self.status;

        match self.status {
            EncounterStatus::Victory => report
                .lines
                .push(format!("{} is defeated!", self.opponent.name)),
            EncounterStatus::Defeat => report
                .lines
                .push(format!("{} falls.", self.character_name)),
            EncounterStatus::Fled | EncounterStatus::Ongoing => {}
        }

        let round = self.round;
        self.log
            .extend(report.lines.iter().map(|line| format!("Round {round}: {line}")));

        tracing::debug!(
            round,
            action = %action,
            dealt = report.damage_dealt,
            taken = report.damage_taken,
            status = %self.status,
            "encounter round"
        );

        Ok(report)
    }

    fn attempt_flee(&self, dice: &mut dyn Dice, report: &mut RoundReport) {
        let chance = formula::flee_chance(&self.combat, self.stats.agility);
        if dice.chance(chance) {
            report.fled = true;
            report.lines.push(format!(
                "{} escapes from {}.",
                self.character_name, self.opponent.name
            ));
        } else {
            report
                .lines
                .push(format!("{} tries to flee but fails.", self.character_name));
        }
    }

    fn strike(
        &mut self,
        action: Action,
        dice: &mut dyn Dice,
        durability: &mut dyn Durability,
        report: &mut RoundReport,
    ) {
        let heavy = action == Action::HeavyAttack;
        let hit = formula::hit_chance(&self.combat, self.stats.agility, heavy);
        if !dice.chance(hit) {
            report.lines.push(format!(
                "{} misses {}.",
                self.character_name, self.opponent.name
            ));
            return;
        }

        report.hit = true;
        report.critical = dice.chance(formula::crit_chance(&self.combat, self.stats.luck));

        let heavy_multiplier = if heavy {
            self.combat.heavy_damage_multiplier
        } else {
            1.0
        };
        let crit_multiplier = if report.critical {
            self.combat.crit_multiplier
        } else {
            1.0
        };
        let bonus = self.effects.get(EffectKind::DamageBonus).max(0.0).round() as u32;
        let damage = formula::strike_damage(
            self.attack,
            self.opponent.defense,
            self.stats.strength,
            heavy_multiplier,
            crit_multiplier,
        )
        .saturating_add(bonus);

        self.opponent_health = self.opponent_health.saturating_sub(damage);
        self.damage_dealt += u64::from(damage);
        report.damage_dealt = damage;

        let verb = if heavy { "smashes" } else { "hits" };
        let crit = if report.critical { " Critical hit!" } else { "" };
        report.lines.push(format!(
            "{} {verb} {} for {damage} damage.{crit}",
            self.character_name, self.opponent.name
        ));

        match durability.consume_tool_durability(self.character_id, action) {
            Ok(Some(wear)) if wear.broke => {
                report.tool_broke = true;
                report.lines.push(format!("{} broke!", wear.tool_name));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    character = %self.character_id,
                    error = %err,
                    "durability consumption failed"
                );
            }
        }
    }

    fn counter_attack(&mut self, defending: bool, report: &mut RoundReport) {
        let damage = formula::counter_damage(
            self.opponent.attack,
            self.defense,
            self.opponent.strength,
            defending,
        );
        self.character_health = self.character_health.saturating_sub(damage);
        self.damage_taken += u64::from(damage);
        report.damage_taken = damage;

        let blocked = if defending { " (blocked half)" } else { "" };
        report.lines.push(format!(
            "{} hits {} for {damage} damage{blocked}.",
            self.opponent.name, self.character_name
        ));
    }

    /// The character in this encounter.
    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    /// The opponent, as it was when the encounter started.
    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    /// Current status.
    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    /// Whether the encounter is terminal.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Rounds played so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The character's remaining health.
    pub fn character_health(&self) -> u32 {
        self.character_health
    }

    /// The opponent's remaining health.
    pub fn opponent_health(&self) -> u32 {
        self.opponent_health
    }

    /// Total damage dealt to the opponent.
    pub fn damage_dealt(&self) -> u64 {
        self.damage_dealt
    }

    /// Total damage taken from the opponent.
    pub fn damage_taken(&self) -> u64 {
        self.damage_taken
    }

    /// Effects active for this encounter.
    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    /// The round-by-round narrative.
    pub fn log(&self) -> &[String] {
        &self.log
    }
}
