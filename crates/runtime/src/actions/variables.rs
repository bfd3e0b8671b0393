use game_core::{ActionClause, ScriptError};
use tracing::debug;

use super::{invalid, pair_param};
use crate::event::{Action, ActionContext, ActionStart};

/// Sets one or more variables: `set_variable greeted:yes,visits:1`.
pub struct SetVariable;

impl Action for SetVariable {
    fn name(&self) -> &'static str {
        "set_variable"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        clause.param(0)?;
        for index in 0..clause.parameters.len() {
            let (key, value) = pair_param(clause, index, ':')?;
            ctx.world.variables.set(key, value);
        }
        Ok(ActionStart::Complete)
    }
}

/// Removes one or more variables: `clear_variable greeted,visits`.
pub struct ClearVariable;

impl Action for ClearVariable {
    fn name(&self) -> &'static str {
        "clear_variable"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        clause.param(0)?;
        for key in clause.parameters.iter().filter(|k| !k.is_empty()) {
            ctx.world.variables.remove(key);
        }
        Ok(ActionStart::Complete)
    }
}

/// Arithmetic on a variable: `variable_math steps,+,1[,result]`.
///
/// The second operand may be a number or a variable. The result is written to
/// `result` when given, otherwise back to the first variable.
pub struct VariableMath;

impl Action for VariableMath {
    fn name(&self) -> &'static str {
        "variable_math"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let variables = &mut ctx.world.variables;
        let target = clause.param(0)?;
        let left = variables.number_or_variable(target)?;
        let right = variables.number_or_variable(clause.param(2)?)?;
        let value = match clause.param(1)? {
            "+" => left + right,
            "-" => left - right,
            "*" => left * right,
            "/" if right == 0.0 => return Err(invalid(clause, 2, "division by zero")),
            "/" => left / right,
            op => return Err(invalid(clause, 1, format!("invalid operation type `{op}`"))),
        };
        let result = clause.opt_param(3).unwrap_or(target);
        variables.set_number(result, value);
        debug!(target: "runtime::events", variable = result, value, "variable_math");
        Ok(ActionStart::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::start;
    use game_core::World;

    #[test]
    fn set_and_clear_variables() {
        let mut world = World::new();
        start(&SetVariable, &mut world, "set_variable greeted:yes, visits:1").unwrap();
        assert_eq!(world.variables.get("greeted"), Some("yes"));
        assert_eq!(world.variables.get("visits"), Some("1"));

        start(&ClearVariable, &mut world, "clear_variable greeted").unwrap();
        assert!(!world.variables.contains("greeted"));
        assert!(world.variables.contains("visits"));
    }

    #[test]
    fn set_variable_requires_pairs() {
        let mut world = World::new();
        assert!(matches!(
            start(&SetVariable, &mut world, "set_variable greeted"),
            Err(ScriptError::InvalidParameter { index: 0, .. })
        ));
        assert!(matches!(
            start(&SetVariable, &mut world, "set_variable"),
            Err(ScriptError::MissingParameter { index: 0, .. })
        ));
    }

    #[test]
    fn variable_math_updates_in_place_or_into_result() {
        let mut world = World::new();
        world.variables.set("steps", "2");
        start(&VariableMath, &mut world, "variable_math steps,+,1").unwrap();
        assert_eq!(world.variables.get("steps"), Some("3"));

        world.variables.set("factor", "4");
        start(&VariableMath, &mut world, "variable_math steps,*,factor,total").unwrap();
        assert_eq!(world.variables.get("total"), Some("12"));
        assert_eq!(world.variables.get("steps"), Some("3"));

        start(&VariableMath, &mut world, "variable_math steps,/,2").unwrap();
        assert_eq!(world.variables.get("steps"), Some("1.5"));
    }

    #[test]
    fn variable_math_rejects_bad_operations() {
        let mut world = World::new();
        assert!(matches!(
            start(&VariableMath, &mut world, "variable_math steps,/,0"),
            Err(ScriptError::InvalidParameter { index: 2, .. })
        ));
        assert!(matches!(
            start(&VariableMath, &mut world, "variable_math steps,^,2"),
            Err(ScriptError::InvalidParameter { index: 1, .. })
        ));
    }
}
