//! Runtime orchestration for the state stack and map-event scripting.
//!
//! This crate interprets the `game-core` data model tick by tick. Consumers
//! register their screens as [`State`]s, load maps, and drive a [`Game`] with
//! one [`Game::tick`] per frame.
//!
//! Modules are organized by responsibility:
//! - [`state`] hosts the state stack manager and the state lifecycle contract
//! - [`event`] provides the event engine and the condition/action registry
//! - [`conditions`] and [`actions`] hold the built-in script vocabulary
//! - [`game`] composes everything into the per-tick driver
pub mod actions;
pub mod conditions;
pub mod error;
pub mod event;
pub mod game;
pub mod state;

pub use error::{Result, StackError, TeleportError};
pub use event::{
    Action, ActionContext, ActionStart, ActionStatus, BlockingAction, Condition,
    ConditionContext, DIRECT_SCRIPT, EngineReport, EventEngine, PartialMatch, ScriptFailure,
    ScriptRegistry, TriggerMode,
};
pub use game::{Game, GameBuilder, TickReport};
pub use state::{Lifecycle, State, StateEntry, StateFactory, StateFlags, StateId, StateManager, TickContext};
