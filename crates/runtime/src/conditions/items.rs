use game_core::{ConditionClause, ScriptError};

use crate::event::{Condition, ConditionContext};

/// The player carries at least `min` (default 1) of an item.
///
/// `is has_item potion` or `is has_item potion,3`.
pub struct HasItem;

impl Condition for HasItem {
    fn name(&self) -> &'static str {
        "has_item"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause) -> Result<bool, ScriptError> {
        let item = clause.param(0)?;
        let min = match clause.opt_param(1) {
            Some(_) => clause.parse_param::<u32>(1)?,
            None => 1,
        };
        Ok(ctx.world.player.inventory.quantity(item) >= min)
    }
}
