//! Deferred requests raised by scripts and states during a tick.
//!
//! Actions cannot touch the state stack or reload the map while the event
//! engine is iterating, so they queue requests on the world instead. The
//! driver applies them once the engine pass for the tick has finished.

use std::collections::BTreeMap;

use super::Position;

/// Keyword arguments handed to a state's `startup` hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateArgs {
    values: BTreeMap<String, String>,
}

impl StateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A state-stack transition requested from inside a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateRequest {
    Push { name: String, args: StateArgs },
    /// Pops the top state.
    Pop,
    /// Pops the topmost instance of the named state.
    PopNamed(String),
    Replace { name: String, args: StateArgs },
    Queue { name: String, args: StateArgs },
}

/// Destination of a teleport, possibly on another map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Teleport {
    pub map: String,
    pub position: Position,
}

impl Teleport {
    pub fn new(map: impl Into<String>, position: Position) -> Self {
        Self {
            map: map.into(),
            position,
        }
    }
}
