use game_core::{Button, ConditionClause, ScriptError};

use crate::event::{Condition, ConditionContext, TriggerMode};

/// A button was pressed this tick and no state consumed it.
pub struct ButtonPressed;

impl Condition for ButtonPressed {
    fn name(&self) -> &'static str {
        "button_pressed"
    }

    fn trigger(&self) -> TriggerMode {
        TriggerMode::Level
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause) -> Result<bool, ScriptError> {
        let button = clause.parse_param::<Button>(0)?;
        Ok(ctx.world.input.pressed(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::test_support::test_clause;
    use game_core::{EventPersist, InputEvent, Region, World};

    #[test]
    fn reads_unconsumed_input() {
        let mut world = World::new();
        let mut persist = EventPersist::new();
        let region = Region::tile(0, 0);
        assert!(!test_clause(&ButtonPressed, &world, &mut persist, region, "is button_pressed a").unwrap());

        world.input.push(InputEvent::press(Button::A));
        assert!(test_clause(&ButtonPressed, &world, &mut persist, region, "is button_pressed A").unwrap());
        assert!(matches!(
            test_clause(&ButtonPressed, &world, &mut persist, region, "is button_pressed z"),
            Err(ScriptError::InvalidParameter { .. })
        ));
    }
}
