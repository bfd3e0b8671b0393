//! Condition and action clauses of an event script.
//!
//! Clauses are authored as short text lines:
//!
//! ```text
//! is variable_is steps,>=,3
//! is_not has_item potion
//! set_variable greeted:yes
//! npc_move maple,up 2,left
//! ```
//!
//! The first word of a condition is its [`Operator`], then the type
//! identifier, then a comma separated parameter list. Actions have no operator.

use std::fmt;
use std::str::FromStr;

use strum::{AsRefStr, Display, EnumString};

use crate::error::ScriptError;

/// How a condition's raw test result is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operator {
    /// The condition must test true.
    #[default]
    Is,
    /// The condition must test false.
    IsNot,
}

impl Operator {
    /// Applies the operator to a raw condition result.
    #[inline]
    pub fn apply(self, raw: bool) -> bool {
        match self {
            Operator::Is => raw,
            Operator::IsNot => !raw,
        }
    }
}

/// One condition entry: operator, type identifier and parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionClause {
    pub operator: Operator,
    pub kind: String,
    pub parameters: Vec<String>,
}

impl ConditionClause {
    pub fn new(operator: Operator, kind: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            operator,
            kind: kind.into(),
            parameters,
        }
    }

    pub fn param(&self, index: usize) -> Result<&str, ScriptError> {
        param(&self.kind, &self.parameters, index)
    }

    pub fn opt_param(&self, index: usize) -> Option<&str> {
        opt_param(&self.parameters, index)
    }

    pub fn parse_param<T>(&self, index: usize) -> Result<T, ScriptError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        parse_param(&self.kind, &self.parameters, index)
    }
}

impl FromStr for ConditionClause {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (operator, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| ScriptError::MalformedClause(line.to_string()))?;
        let operator = operator
            .parse::<Operator>()
            .map_err(|_| ScriptError::InvalidOperator(operator.to_string()))?;
        let (kind, parameters) = split_clause(rest)?;
        Ok(Self::new(operator, kind, parameters))
    }
}

impl fmt::Display for ConditionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.kind)?;
        write_parameters(f, &self.parameters)
    }
}

/// One action entry: type identifier and parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionClause {
    pub kind: String,
    pub parameters: Vec<String>,
}

impl ActionClause {
    pub fn new(kind: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            kind: kind.into(),
            parameters,
        }
    }

    pub fn param(&self, index: usize) -> Result<&str, ScriptError> {
        param(&self.kind, &self.parameters, index)
    }

    pub fn opt_param(&self, index: usize) -> Option<&str> {
        opt_param(&self.parameters, index)
    }

    pub fn parse_param<T>(&self, index: usize) -> Result<T, ScriptError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        parse_param(&self.kind, &self.parameters, index)
    }

    /// Parses an optional parameter, falling back to `default` when absent.
    pub fn parse_param_or<T>(&self, index: usize, default: T) -> Result<T, ScriptError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.opt_param(index) {
            None => Ok(default),
            Some(_) => self.parse_param(index),
        }
    }
}

impl FromStr for ActionClause {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, parameters) = split_clause(line.trim())?;
        Ok(Self::new(kind, parameters))
    }
}

impl fmt::Display for ActionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        write_parameters(f, &self.parameters)
    }
}

fn split_clause(text: &str) -> Result<(String, Vec<String>), ScriptError> {
    let text = text.trim();
    let (kind, raw) = match text.split_once(char::is_whitespace) {
        Some((kind, raw)) => (kind, raw.trim()),
        None => (text, ""),
    };
    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ScriptError::MalformedClause(text.to_string()));
    }
    let parameters = if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(|p| p.trim().to_string()).collect()
    };
    Ok((kind.to_string(), parameters))
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &[String]) -> fmt::Result {
    if !parameters.is_empty() {
        write!(f, " {}", parameters.join(","))?;
    }
    Ok(())
}

fn param<'a>(kind: &str, parameters: &'a [String], index: usize) -> Result<&'a str, ScriptError> {
    opt_param(parameters, index).ok_or_else(|| ScriptError::MissingParameter {
        clause: kind.to_string(),
        index,
    })
}

fn opt_param(parameters: &[String], index: usize) -> Option<&str> {
    parameters
        .get(index)
        .map(String::as_str)
        .filter(|p| !p.is_empty())
}

fn parse_param<T>(kind: &str, parameters: &[String], index: usize) -> Result<T, ScriptError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = param(kind, parameters, index)?;
    raw.parse::<T>().map_err(|e| ScriptError::InvalidParameter {
        clause: kind.to_string(),
        index,
        reason: format!("`{raw}`: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_condition_with_parameters() {
        let clause: ConditionClause = "is_not variable_is steps, >=, 3".parse().unwrap();
        assert_eq!(clause.operator, Operator::IsNot);
        assert_eq!(clause.kind, "variable_is");
        assert_eq!(clause.parameters, vec!["steps", ">=", "3"]);
        assert_eq!(clause.to_string(), "is_not variable_is steps,>=,3");
    }

    #[test]
    fn parses_condition_without_parameters() {
        let clause: ConditionClause = "is player_moved".parse().unwrap();
        assert_eq!(clause.kind, "player_moved");
        assert!(clause.parameters.is_empty());
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = "maybe player_at".parse::<ConditionClause>().unwrap_err();
        assert_eq!(err, ScriptError::InvalidOperator("maybe".into()));
    }

    #[test]
    fn rejects_operator_only() {
        assert!(matches!(
            "is".parse::<ConditionClause>(),
            Err(ScriptError::MalformedClause(_))
        ));
    }

    #[test]
    fn parses_action() {
        let clause: ActionClause = "npc_move maple,up 2,left".parse().unwrap();
        assert_eq!(clause.kind, "npc_move");
        assert_eq!(clause.parameters, vec!["maple", "up 2", "left"]);
    }

    #[test]
    fn typed_parameter_errors_name_the_clause() {
        let clause: ActionClause = "wait soon".parse().unwrap();
        let err = clause.parse_param::<u32>(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidParameter { index: 0, .. }));
        let err = clause.param(1).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingParameter {
                clause: "wait".into(),
                index: 1
            }
        );
    }
}
