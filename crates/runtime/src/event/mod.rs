//! Map-event scripting engine.
//!
//! Event scripts are small declarative programs attached to map regions. Each
//! tick the [`EventEngine`] tests their condition clauses against the world and
//! runs the action clauses of scripts whose conditions are all satisfied.
//!
//! # Architecture
//!
//! - Condition and action identifiers resolve through the [`ScriptRegistry`]
//! - Every clause result is kept as a [`PartialMatch`] for diagnostics and for
//!   conditions that compare against the previous tick
//! - A fired script becomes a running chain; non-blocking actions complete in
//!   the tick they start, blocking actions are polled on later ticks
//! - Failures never escape a tick: they are logged with the script location
//!   and returned in the [`EngineReport`]
//!
//! # Triggering
//!
//! Conditions declare a [`TriggerMode`]. A script whose conditions are all
//! `Edge` fires once per false→true transition of its combined result. A script
//! with at least one `Level` condition fires on every tick it is satisfied and
//! not already running. `init` and `interact` scripts are only evaluated on
//! their dedicated ticks and always fire when satisfied there.
mod context;
mod engine;
mod registry;
mod status;

pub use context::{ActionContext, ConditionContext};
pub use engine::{DIRECT_SCRIPT, EngineReport, EventEngine, PartialMatch, ScriptFailure};
pub use registry::ScriptRegistry;
pub use status::ActionStatus;

use std::fmt;

use game_core::{ActionClause, ConditionClause, ScriptError};

/// How a condition contributes to its script's triggering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriggerMode {
    /// The script fires once per false→true transition.
    #[default]
    Edge,

    /// The script fires every tick the condition holds.
    ///
    /// Used by conditions that already detect their own edges, or that are
    /// only true for a single tick.
    Level,
}

/// A named condition type.
///
/// Conditions are reads: apart from their own persistent slot they must not
/// change anything. Unmet conditions return `Ok(false)`; errors are reserved
/// for invalid clauses (bad operator, unparseable parameter).
pub trait Condition: Send + Sync {
    /// Identifier scripts use to reference this condition.
    fn name(&self) -> &'static str;

    fn trigger(&self) -> TriggerMode {
        TriggerMode::Edge
    }

    /// Tests `clause` against the world. The clause operator is applied by the engine.
    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause)
    -> Result<bool, ScriptError>;
}

/// A named action type.
pub trait Action: Send + Sync {
    /// Identifier scripts use to reference this action.
    fn name(&self) -> &'static str;

    /// Character the action drives while it blocks, if any.
    ///
    /// The engine keeps at most one blocking action per actor; another chain
    /// reaching an action for a busy actor waits until it is released.
    fn actor(&self, _clause: &ActionClause) -> Option<String> {
        None
    }

    /// Starts the action.
    fn start(
        &self,
        ctx: &mut ActionContext<'_>,
        clause: &ActionClause,
    ) -> Result<ActionStart, ScriptError>;
}

/// Outcome of [`Action::start`].
pub enum ActionStart {
    /// The action completed within the tick.
    Complete,

    /// The action continues over later ticks.
    Blocking(Box<dyn BlockingAction>),
}

impl ActionStart {
    pub fn blocking(action: impl BlockingAction + 'static) -> Self {
        ActionStart::Blocking(Box::new(action))
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, ActionStart::Blocking(_))
    }
}

impl fmt::Debug for ActionStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStart::Complete => f.write_str("Complete"),
            ActionStart::Blocking(_) => f.write_str("Blocking(..)"),
        }
    }
}

/// The running half of a blocking action.
pub trait BlockingAction: Send {
    /// Advances the action by one tick.
    ///
    /// An error fails the action and aborts its chain.
    fn poll(&mut self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ScriptError>;

    /// Called exactly once when the action finishes, fails or is cancelled.
    fn cleanup(&mut self, _ctx: &mut ActionContext<'_>) {}
}
