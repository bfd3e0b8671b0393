//! Common error infrastructure for game-core.
//!
//! This module provides the severity classification shared by every error in
//! the workspace, plus [`ScriptError`], the failure type of condition tests and
//! actions. Stack usage errors live with the state manager in the runtime.
//!
//! # Design Principles
//!
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Tick isolation**: script errors are values, reported per script and never
//!   abort the tick that produced them

use thiserror::Error;

use crate::world::Position;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: transient gameplay conditions; the work is abandoned and
///   retried from scratch later
/// - **Validation**: bad content or parameters; retrying without fixing the
///   data fails the same way
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: usage errors that signal a bug in the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - e.g. the NPC a blocking action drives was removed.
    Recoverable,

    /// Validation error - e.g. unknown condition identifier, malformed parameter.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - e.g. popping an empty state stack.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all errors in the workspace.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used as a structured logging field and in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failure of a single condition test or action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("condition `{0}` is not registered")]
    UnknownCondition(String),

    #[error("action `{0}` is not registered")]
    UnknownAction(String),

    #[error("invalid operator `{0}`, expected `is` or `is_not`")]
    InvalidOperator(String),

    #[error("malformed clause `{0}`")]
    MalformedClause(String),

    #[error("`{clause}` is missing parameter #{index}")]
    MissingParameter { clause: String, index: usize },

    #[error("`{clause}` parameter #{index} is invalid: {reason}")]
    InvalidParameter {
        clause: String,
        index: usize,
        reason: String,
    },

    #[error("variable `{variable}` holds `{value}`, which is not a number")]
    NotANumber { variable: String, value: String },

    #[error("character `{0}` not found")]
    CharacterNotFound(String),

    #[error("position {0} is outside the map")]
    OutOfBounds(Position),

    #[error("state `{0}` never became active")]
    StateNotActive(String),

    #[error("blocking action `{action}` timed out after {ticks} ticks")]
    ActionTimedOut { action: String, ticks: u32 },
}

impl GameError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CharacterNotFound(_)
            | Self::OutOfBounds(_)
            | Self::ActionTimedOut { .. } => ErrorSeverity::Recoverable,
            Self::UnknownCondition(_)
            | Self::UnknownAction(_)
            | Self::InvalidOperator(_)
            | Self::MalformedClause(_)
            | Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::NotANumber { .. }
            | Self::StateNotActive(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCondition(_) => "unknown_condition",
            Self::UnknownAction(_) => "unknown_action",
            Self::InvalidOperator(_) => "invalid_operator",
            Self::MalformedClause(_) => "malformed_clause",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::NotANumber { .. } => "not_a_number",
            Self::CharacterNotFound(_) => "character_not_found",
            Self::OutOfBounds(_) => "out_of_bounds",
            Self::StateNotActive(_) => "state_not_active",
            Self::ActionTimedOut { .. } => "action_timed_out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_errors_are_validation() {
        let err = ScriptError::UnknownAction("fly".into());
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.error_code(), "unknown_action");
    }

    #[test]
    fn gameplay_errors_are_recoverable() {
        let err = ScriptError::CharacterNotFound("maple".into());
        assert!(err.severity().is_recoverable());
        assert_eq!(err.to_string(), "character `maple` not found");
    }
}
