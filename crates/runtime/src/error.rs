//! Usage errors surfaced by the state stack.
//!
//! These indicate a bug in the caller (popping an empty stack, pushing a
//! state that was never registered) and are returned immediately rather than
//! recovered from. When a script requests the faulty transition, the driver
//! logs the error and carries on with the tick.
//!
//! [`TeleportError`] covers map changes requested by scripts; the driver logs
//! and reports those too.
use game_core::{ErrorSeverity, GameError, Position};
use thiserror::Error;

use crate::state::StateId;

pub type Result<T> = std::result::Result<T, StackError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("attempted to pop a state while the stack is empty")]
    EmptyStack,

    #[error("state `{0}` is not registered")]
    UnknownState(String),

    #[error("state `{0}` is already registered")]
    DuplicateState(String),

    #[error("states must be registered with a non-empty name")]
    EmptyName,

    #[error("state {0} is not on the stack")]
    NotActive(StateId),

    #[error("no state named `{0}` is on the stack")]
    NameNotActive(String),
}

impl GameError for StackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyStack => "empty_stack",
            Self::UnknownState(_) => "unknown_state",
            Self::DuplicateState(_) => "duplicate_state",
            Self::EmptyName => "empty_name",
            Self::NotActive(_) => "not_active",
            Self::NameNotActive(_) => "name_not_active",
        }
    }
}

/// Failure to move the player to a teleport destination.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TeleportError {
    #[error("map `{0}` is not in the map library")]
    UnknownMap(String),

    #[error("teleport destination {0} is outside map `{1}`")]
    OutOfBounds(Position, String),
}

impl GameError for TeleportError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMap(_) => "unknown_map",
            Self::OutOfBounds(..) => "teleport_out_of_bounds",
        }
    }
}
