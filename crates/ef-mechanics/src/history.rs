//! Encounter history records and export.

use chrono::{DateTime, Utc};
use ef_core::{CharacterId, OpponentId};
use serde::{Deserialize, Serialize};

use crate::encounter::EncounterStatus;
use crate::error::EngineResult;
use crate::ports::HistorySink;
use crate::resolution::LootDrop;

/// The write-once record of one finished encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Who fought.
    pub character_id: CharacterId,
    /// What they fought.
    pub opponent_id: OpponentId,
    /// How it ended.
    pub result: EncounterStatus,
    /// Rounds played.
    pub rounds: u32,
    /// Total damage dealt.
    pub damage_dealt: u64,
    /// Total damage taken.
    pub damage_taken: u64,
    /// Character experience awarded.
    pub xp_gained: u64,
    /// Items awarded.
    pub loot: Vec<LootDrop>,
    /// When the encounter was resolved.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// One-line description without the timestamp.
    pub fn summary_line(&self) -> String {
        let loot = if self.loot.is_empty() {
            "none".to_string()
        } else {
            self.loot
                .iter()
                .map(|drop| format!("{} x{}", drop.item, drop.quantity))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} vs {}: {} in {} rounds, dealt {}, took {}, +{} xp, loot: {}",
            self.character_id,
            self.opponent_id,
            self.result,
            self.rounds,
            self.damage_dealt,
            self.damage_taken,
            self.xp_gained,
            loot
        )
    }
}

/// An append-only in-memory history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Records for one character.
    pub fn for_character(&self, id: CharacterId) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().filter(move |r| r.character_id == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Export as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Encounter History\n=================\n\n");
        for record in &self.records {
            out.push_str(&format!(
                "[{}] {}\n",
                record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                record.summary_line()
            ));
        }
        out
    }

    /// Export as a markdown table.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Encounter History\n\n");
        out.push_str("| Opponent | Result | Rounds | Dealt | Taken | XP | Loot |\n");
        out.push_str("|---|---|---|---|---|---|---|\n");
        for r in &self.records {
            let loot: Vec<String> = r
                .loot
                .iter()
                .map(|d| format!("{} x{}", d.item, d.quantity))
                .collect();
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                r.opponent_id,
                r.result,
                r.rounds,
                r.damage_dealt,
                r.damage_taken,
                r.xp_gained,
                loot.join(", ")
            ));
        }
        out
    }

    /// Serialize the log to pretty JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ef_core::CoreError::from(e).into())
    }
}

impl HistorySink for HistoryLog {
    fn record(&mut self, record: HistoryRecord) {
        tracing::debug!(character = %record.character_id, result = %record.result, "history recorded");
        self.records.push(record);
    }
}
