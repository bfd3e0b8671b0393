use std::str::FromStr;

use game_core::{ConditionClause, ScriptError};
use strum::{AsRefStr, Display, EnumString};

use crate::event::{Condition, ConditionContext};

/// Comparison operator of `variable_is`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
pub enum Comparison {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
}

impl Comparison {
    pub fn compare(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Ne => left != right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
        }
    }
}

/// A game variable is set, optionally to a specific value.
///
/// `is variable_set greeted` or `is variable_set greeted:yes`.
pub struct VariableSet;

impl Condition for VariableSet {
    fn name(&self) -> &'static str {
        "variable_set"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause) -> Result<bool, ScriptError> {
        let variables = &ctx.world.variables;
        Ok(match clause.param(0)?.split_once(':') {
            Some((key, value)) => variables.get(key.trim()) == Some(value.trim()),
            None => variables.contains(clause.param(0)?),
        })
    }
}

/// Numeric comparison between two numbers or variables.
///
/// `is variable_is steps,>=,3`. Unset variables count as zero.
pub struct VariableIs;

impl Condition for VariableIs {
    fn name(&self) -> &'static str {
        "variable_is"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause) -> Result<bool, ScriptError> {
        let variables = &ctx.world.variables;
        let left = variables.number_or_variable(clause.param(0)?)?;
        let raw = clause.param(1)?;
        let comparison = Comparison::from_str(raw).map_err(|_| ScriptError::InvalidParameter {
            clause: clause.kind.clone(),
            index: 1,
            reason: format!("invalid operation type `{raw}`"),
        })?;
        let right = variables.number_or_variable(clause.param(2)?)?;
        Ok(comparison.compare(left, right))
    }
}
