//! Declarative per-map event scripts.
//!
//! An [`EventScript`] pairs a rectangular map region with an ordered list of
//! condition clauses and an ordered list of action clauses. Scripts are built
//! from map data at load time and stay immutable while the map is active; the
//! runtime's event engine interprets them tick by tick.
mod clause;
mod map;

use std::fmt;

use strum::{AsRefStr, Display, EnumString};

pub use clause::{ActionClause, ConditionClause, Operator};
pub use map::{MapDefinition, NpcSpawn};

use crate::world::Position;

/// Stable identity of a script within a loaded map (its load order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptId(pub u32);

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identity of one condition clause: owning script plus clause index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConditionKey {
    pub script: ScriptId,
    pub clause: usize,
}

impl ConditionKey {
    pub const fn new(script: ScriptId, clause: usize) -> Self {
        Self { script, clause }
    }
}

/// When a script is eligible for evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptKind {
    /// Evaluated every tick.
    #[default]
    Event,
    /// Evaluated once, on the first tick after the map is loaded.
    Init,
    /// Evaluated only on ticks where the interact button was pressed.
    Interact,
}

/// Rectangular map area a script is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Single-tile region.
    pub const fn tile(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.x <= position.x
            && position.x < self.x + self.width
            && self.y <= position.y
            && position.y < self.y + self.height
    }

    pub const fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Immutable script record created from map data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventScript {
    pub id: ScriptId,
    pub name: String,
    pub kind: ScriptKind,
    pub region: Region,
    pub conditions: Vec<ConditionClause>,
    pub actions: Vec<ActionClause>,
}

impl EventScript {
    pub fn new(id: ScriptId, name: impl Into<String>, region: Region) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ScriptKind::Event,
            region,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ScriptKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ConditionClause) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionClause) -> Self {
        self.actions.push(action);
        self
    }

    /// Location used to point at the script in diagnostics.
    pub fn location(&self) -> ScriptLocation {
        ScriptLocation {
            script: self.id,
            name: self.name.clone(),
            position: self.region.origin(),
        }
    }

    pub fn condition_key(&self, clause: usize) -> ConditionKey {
        ConditionKey::new(self.id, clause)
    }
}

/// Where a script lives on the map, attached to logged and reported failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptLocation {
    pub script: ScriptId,
    pub name: String,
    pub position: Position,
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({}) at {}", self.name, self.script, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_contains_is_half_open() {
        let region = Region::new(2, 3, 2, 1);
        assert!(region.contains(Position::new(2, 3)));
        assert!(region.contains(Position::new(3, 3)));
        assert!(!region.contains(Position::new(4, 3)));
        assert!(!region.contains(Position::new(2, 4)));
    }

    #[test]
    fn location_names_the_script() {
        let script = EventScript::new(ScriptId(7), "greet", Region::tile(4, 5));
        assert_eq!(script.location().to_string(), "`greet` (#7) at (4, 5)");
    }
}
