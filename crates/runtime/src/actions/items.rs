use game_core::{ActionClause, ScriptError};
use tracing::warn;

use crate::event::{Action, ActionContext, ActionStart};

/// Gives the player items: `add_item potion[,quantity]`.
pub struct AddItem;

impl Action for AddItem {
    fn name(&self) -> &'static str {
        "add_item"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let item = clause.param(0)?;
        let quantity = clause.parse_param_or(1, 1u32)?;
        ctx.world.player.inventory.add(item, quantity);
        Ok(ActionStart::Complete)
    }
}

/// Takes items from the player: `remove_item potion[,quantity]`.
///
/// Removes what is there; a shortfall is logged, not failed.
pub struct RemoveItem;

impl Action for RemoveItem {
    fn name(&self) -> &'static str {
        "remove_item"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let item = clause.param(0)?;
        let quantity = clause.parse_param_or(1, 1u32)?;
        let removed = ctx.world.player.inventory.remove(item, quantity);
        if removed < quantity {
            warn!(
                target: "runtime::events",
                item,
                requested = quantity,
                removed,
                script = %ctx.script.id,
                "player had fewer items than requested"
            );
        }
        Ok(ActionStart::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::start;
    use game_core::World;

    #[test]
    fn add_and_remove_items() {
        let mut world = World::new();
        start(&AddItem, &mut world, "add_item potion,3").unwrap();
        start(&AddItem, &mut world, "add_item ether").unwrap();
        assert_eq!(world.player.inventory.quantity("potion"), 3);
        assert_eq!(world.player.inventory.quantity("ether"), 1);

        start(&RemoveItem, &mut world, "remove_item potion,5").unwrap();
        assert_eq!(world.player.inventory.quantity("potion"), 0);
        assert!(start(&AddItem, &mut world, "add_item potion,many").is_err());
    }
}
