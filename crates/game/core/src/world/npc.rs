use std::collections::BTreeMap;

use super::Character;

/// NPCs on the current map, keyed by slug.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NpcRegistry {
    npcs: BTreeMap<String, Character>,
}

impl NpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an NPC, replacing (and returning) any NPC with the same slug.
    pub fn insert(&mut self, npc: Character) -> Option<Character> {
        self.npcs.insert(npc.slug.clone(), npc)
    }

    pub fn remove(&mut self, slug: &str) -> Option<Character> {
        self.npcs.remove(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&Character> {
        self.npcs.get(slug)
    }

    pub fn get_mut(&mut self, slug: &str) -> Option<&mut Character> {
        self.npcs.get_mut(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.npcs.contains_key(slug)
    }

    pub fn clear(&mut self) {
        self.npcs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> + '_ {
        self.npcs.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> + '_ {
        self.npcs.values_mut()
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}
