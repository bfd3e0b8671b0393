//! Registry mapping clause identifiers to condition and action implementations.

use std::collections::HashMap;
use std::sync::Arc;

use game_core::{EventScript, ScriptError};
use tracing::debug;

use super::{Action, Condition};

/// Lookup table from identifier to condition/action implementation.
///
/// The registry holds no game state; it is populated once at startup and read
/// by the engine on every evaluation.
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    conditions: HashMap<&'static str, Arc<dyn Condition>>,
    actions: HashMap<&'static str, Arc<dyn Action>>,
}

impl ScriptRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in condition and action.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for condition in crate::conditions::builtin() {
            registry.conditions.insert(condition.name(), condition);
        }
        for action in crate::actions::builtin() {
            registry.actions.insert(action.name(), action);
        }
        registry
    }

    /// Registers a condition, returning the implementation it replaced.
    pub fn register_condition(
        &mut self,
        condition: impl Condition + 'static,
    ) -> Option<Arc<dyn Condition>> {
        let name = condition.name();
        debug!(target: "runtime::events", condition = name, "registered condition");
        self.conditions.insert(name, Arc::new(condition))
    }

    /// Registers an action, returning the implementation it replaced.
    pub fn register_action(&mut self, action: impl Action + 'static) -> Option<Arc<dyn Action>> {
        let name = action.name();
        debug!(target: "runtime::events", action = name, "registered action");
        self.actions.insert(name, Arc::new(action))
    }

    /// Finds a condition by identifier.
    pub fn condition(&self, name: &str) -> Option<&Arc<dyn Condition>> {
        self.conditions.get(name)
    }

    /// Finds an action by identifier.
    pub fn action(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(name)
    }

    /// Returns an iterator over registered condition identifiers (for debugging).
    pub fn condition_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.conditions.keys().copied()
    }

    /// Returns an iterator over registered action identifiers (for debugging).
    pub fn action_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    /// Lists the identifiers `script` references that are not registered.
    ///
    /// Loaders call this to report broken content before a map goes live.
    pub fn validate(&self, script: &EventScript) -> Vec<ScriptError> {
        let conditions = script
            .conditions
            .iter()
            .filter(|c| !self.conditions.contains_key(c.kind.as_str()))
            .map(|c| ScriptError::UnknownCondition(c.kind.clone()));
        let actions = script
            .actions
            .iter()
            .filter(|a| !self.actions.contains_key(a.kind.as_str()))
            .map(|a| ScriptError::UnknownAction(a.kind.clone()));
        conditions.chain(actions).collect()
    }
}
