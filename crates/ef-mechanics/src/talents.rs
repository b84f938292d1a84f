//! Talent catalog and unlock evaluation.
//!
//! Talents are gated by lifetime skill experience and by prerequisite
//! talents. Unlocks are monotonic: a refresh only ever adds to a
//! character's [`TalentBook`].

use std::collections::HashMap;

use chrono::Utc;
use ef_core::{SkillName, SkillTrack, TalentBook, TalentCode, TalentNode, UnlockedTalent};

use crate::error::EngineError;

/// All talent nodes of every skill, indexed by code.
#[derive(Debug, Clone, Default)]
pub struct TalentCatalog {
    nodes: Vec<TalentNode>,
    index: HashMap<TalentCode, usize>,
}

impl TalentCatalog {
    /// Build a catalog. Later nodes with a duplicate code are ignored.
    pub fn new(nodes: impl IntoIterator<Item = TalentNode>) -> Self {
        let mut catalog = Self::default();
        for node in nodes {
            if catalog.index.contains_key(&node.code) {
                tracing::warn!(talent = %node.code, "duplicate talent code ignored");
                continue;
            }
            catalog.index.insert(node.code.clone(), catalog.nodes.len());
            catalog.nodes.push(node);
        }
        catalog
    }

    /// Look up a node by code.
    pub fn get(&self, code: &TalentCode) -> Option<&TalentNode> {
        self.index.get(code).map(|&i| &self.nodes[i])
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes of one skill, ordered by tier then threshold.
    pub fn for_skill(&self, skill: &SkillName) -> Vec<&TalentNode> {
        let mut nodes: Vec<&TalentNode> = self.nodes.iter().filter(|n| &n.skill == skill).collect();
        nodes.sort_by_key(|n| (n.tier, n.threshold));
        nodes
    }

    /// Every prerequisite that references a node not in the catalog.
    pub fn inconsistencies(&self) -> Vec<EngineError> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.prerequisites
                    .iter()
                    .filter(|p| !self.index.contains_key(*p))
                    .map(|missing| EngineError::TalentGraphInconsistency {
                        talent: node.code.clone(),
                        missing: missing.clone(),
                    })
            })
            .collect()
    }

    /// Unlock every eligible talent on the track's skill.
    ///
    /// Walks the skill's nodes in (tier, threshold) order. A node unlocks when
    /// the track's lifetime experience reaches its threshold and all of its
    /// prerequisites are in the book, including ones unlocked earlier in the
    /// same pass. Returns the updated book and the newly unlocked codes.
    pub fn refresh_unlocks(
        &self,
        mut book: TalentBook,
        track: &SkillTrack,
    ) -> (TalentBook, Vec<TalentCode>) {
        let mut unlocked = Vec::new();
        let now = Utc::now();

        for node in self.for_skill(&track.skill) {
            if book.contains(&node.code) {
                continue;
            }
            if let Some(missing) = node
                .prerequisites
                .iter()
                .find(|p| !self.index.contains_key(*p))
            {
                let err = EngineError::TalentGraphInconsistency {
                    talent: node.code.clone(),
                    missing: missing.clone(),
                };
                tracing::warn!("{err}; it can never unlock");
                continue;
            }
            if !node.prerequisites.iter().all(|p| book.contains(p)) {
                continue;
            }
            if track.total_experience < node.threshold {
                continue;
            }

            book.unlock(UnlockedTalent {
                code: node.code.clone(),
                skill: node.skill.clone(),
                unlocked_at: now,
            });
            tracing::debug!(talent = %node.code, skill = %node.skill, "talent unlocked");
            unlocked.push(node.code.clone());
        }

        (book, unlocked)
    }
}
