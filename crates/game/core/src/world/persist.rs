//! Cross-frame scratch storage for conditions.

use std::collections::HashMap;

use super::Position;
use crate::script::ConditionKey;

/// Value remembered by a condition between ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum PersistValue {
    Position(Position),
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Event-persistent storage, namespaced by condition type and keyed by the
/// identity of the condition clause that owns the slot.
///
/// Entries are never deleted individually; the whole store is cleared when a
/// map is unloaded.
#[derive(Clone, Debug, Default)]
pub struct EventPersist {
    slots: HashMap<(String, ConditionKey), PersistValue>,
}

impl EventPersist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, condition: &str, key: ConditionKey) -> Option<&PersistValue> {
        self.slots.get(&(condition.to_string(), key))
    }

    pub fn insert(
        &mut self,
        condition: &str,
        key: ConditionKey,
        value: PersistValue,
    ) -> Option<PersistValue> {
        self.slots.insert((condition.to_string(), key), value)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
