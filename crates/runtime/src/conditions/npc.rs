use game_core::{ConditionClause, ScriptError};

use crate::event::{Condition, ConditionContext};

/// An NPC with the given slug is on the map.
pub struct NpcExists;

impl Condition for NpcExists {
    fn name(&self) -> &'static str {
        "npc_exists"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, clause: &ConditionClause) -> Result<bool, ScriptError> {
        Ok(ctx.world.npcs.contains(clause.param(0)?))
    }
}
