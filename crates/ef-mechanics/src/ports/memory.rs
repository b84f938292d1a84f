//! In-memory collaborator adapters.

use std::collections::HashMap;

use ef_core::{Catalog, Character, CharacterId, ItemId, Opponent, OpponentId};

use super::{Durability, Inventory, Persistence, ToolWear};
use crate::encounter::Action;
use crate::error::{EngineError, EngineResult};
use crate::progression::Progress;
use crate::resolution::LootDrop;

/// Stores everything in hash maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    characters: HashMap<CharacterId, Character>,
    opponents: HashMap<OpponentId, Opponent>,
    progress: HashMap<CharacterId, Progress>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a catalog's characters and opponents.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut store = Self::new();
        for character in &catalog.characters {
            store.insert_character(character.clone());
        }
        for opponent in &catalog.opponents {
            store.insert_opponent(opponent.clone());
        }
        store
    }

    /// Add or replace a character.
    pub fn insert_character(&mut self, character: Character) {
        self.characters.insert(character.id, character);
    }

    /// Add or replace an opponent.
    pub fn insert_opponent(&mut self, opponent: Opponent) {
        self.opponents.insert(opponent.id.clone(), opponent);
    }

    /// Find a character by name (case-insensitive).
    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        let lower = name.to_lowercase();
        self.characters
            .values()
            .find(|c| c.name.to_lowercase() == lower)
    }
}

impl Persistence for MemoryStore {
    fn load_character(&self, id: CharacterId) -> EngineResult<Character> {
        self.characters
            .get(&id)
            .cloned()
            .ok_or(EngineError::CharacterNotFound(id))
    }

    fn save_character(&mut self, character: &Character) -> EngineResult<()> {
        self.characters.insert(character.id, character.clone());
        Ok(())
    }

    fn load_opponent(&self, id: &OpponentId) -> EngineResult<Opponent> {
        self.opponents
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::OpponentNotFound(id.clone()))
    }

    fn load_progress(&self, id: CharacterId) -> EngineResult<Progress> {
        Ok(self.progress.get(&id).cloned().unwrap_or_default())
    }

    fn save_progress(&mut self, id: CharacterId, progress: &Progress) -> EngineResult<()> {
        self.progress.insert(id, progress.clone());
        Ok(())
    }
}

/// A character with no tool equipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDurability;

impl Durability for NoDurability {
    fn consume_tool_durability(
        &mut self,
        _character: CharacterId,
        _action: Action,
    ) -> EngineResult<Option<ToolWear>> {
        Ok(None)
    }
}

/// A single equipped tool that loses durability with every strike.
///
/// Heavy attacks wear it twice as fast. Once broken it is unequipped.
#[derive(Debug, Clone)]
pub struct ToolDurability {
    name: String,
    remaining: u32,
}

impl ToolDurability {
    /// Equip a tool with the given durability.
    pub fn new(name: impl Into<String>, durability: u32) -> Self {
        Self {
            name: name.into(),
            remaining: durability,
        }
    }

    /// Durability left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the tool is broken.
    pub fn is_broken(&self) -> bool {
        self.remaining == 0
    }
}

impl Durability for ToolDurability {
    fn consume_tool_durability(
        &mut self,
        _character: CharacterId,
        action: Action,
    ) -> EngineResult<Option<ToolWear>> {
        if self.is_broken() {
            return Ok(None);
        }
        let wear = match action {
            Action::HeavyAttack => 2,
            Action::Attack => 1,
            Action::Defend | Action::Flee => 0,
        };
        self.remaining = self.remaining.saturating_sub(wear);
        Ok(Some(ToolWear {
            tool_name: self.name.clone(),
            broke: self.is_broken(),
            remaining: self.remaining,
        }))
    }
}

/// Counts items per character.
///
/// Optionally limited to a number of distinct item slots per character.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    items: HashMap<(CharacterId, ItemId), u32>,
    slots: Option<usize>,
}

impl MemoryInventory {
    /// Create an empty, unlimited inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty inventory with `slots` distinct items per character.
    pub fn with_slots(slots: usize) -> Self {
        Self {
            items: HashMap::new(),
            slots: Some(slots),
        }
    }

    fn used_slots(&self, character: CharacterId) -> usize {
        self.items.keys().filter(|(owner, _)| *owner == character).count()
    }

    /// How many of `item` the character holds.
    pub fn quantity(&self, character: CharacterId, item: &ItemId) -> u32 {
        self.items
            .get(&(character, item.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Every `(item, quantity)` the character holds, sorted by item.
    pub fn items_of(&self, character: CharacterId) -> Vec<(ItemId, u32)> {
        let mut items: Vec<(ItemId, u32)> = self
            .items
            .iter()
            .filter(|((owner, _), _)| *owner == character)
            .map(|((_, item), qty)| (item.clone(), *qty))
            .collect();
        items.sort();
        items
    }
}

impl Inventory for MemoryInventory {
    fn add_items(&mut self, character: CharacterId, loot: &[LootDrop]) -> EngineResult<()> {
        if let Some(slots) = self.slots {
            let mut new_items: Vec<&ItemId> = loot
                .iter()
                .map(|drop| &drop.item)
                .filter(|item| !self.items.contains_key(&(character, (*item).clone())))
                .collect();
            new_items.sort();
            new_items.dedup();
            let needed = self.used_slots(character) + new_items.len();
            if needed > slots {
                return Err(EngineError::Inventory(format!(
                    "no room for {} new item(s): {needed} of {slots} slots needed",
                    new_items.len()
                )));
            }
        }
        for drop in loot {
            let slot = self.items.entry((character, drop.item.clone())).or_insert(0);
            *slot = slot.saturating_add(drop.quantity);
        }
        Ok(())
    }
}
