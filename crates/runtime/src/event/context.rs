//! Execution contexts lent to conditions and actions.

use game_core::{
    ConditionKey, EngineConfig, EventPersist, EventScript, PersistValue, Region, Tick, World,
};

/// Context provided to a condition while it tests one clause.
///
/// The world is read-only; the only state a condition may write is its own
/// slot in the event-persistent storage, addressed by [`ConditionContext::key`].
pub struct ConditionContext<'a> {
    pub world: &'a World,
    pub persist: &'a mut EventPersist,
    /// The script owning the clause under test.
    pub script: &'a EventScript,
    /// Identity of the clause under test.
    pub key: ConditionKey,
    /// Raw result of this clause on the previous evaluation, if any.
    pub previous: Option<bool>,
    pub tick: Tick,
}

impl ConditionContext<'_> {
    pub fn region(&self) -> Region {
        self.script.region
    }

    /// Reads this clause's persistent slot for the condition type `condition`.
    pub fn recall(&self, condition: &str) -> Option<&PersistValue> {
        self.persist.get(condition, self.key)
    }

    /// Writes this clause's persistent slot for the condition type `condition`.
    pub fn remember(&mut self, condition: &str, value: PersistValue) {
        self.persist.insert(condition, self.key, value);
    }
}

/// Context provided to actions when they start and while they are polled.
pub struct ActionContext<'a> {
    pub world: &'a mut World,
    pub config: &'a EngineConfig,
    /// The script whose chain runs the action.
    pub script: &'a EventScript,
    pub tick: Tick,
}
