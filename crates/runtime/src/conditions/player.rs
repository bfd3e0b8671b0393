use game_core::{ConditionClause, PersistValue, ScriptError};

use crate::event::{Condition, ConditionContext, TriggerMode};

/// The player stands inside the script region.
pub struct PlayerAt;

impl Condition for PlayerAt {
    fn name(&self) -> &'static str {
        "player_at"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, _clause: &ConditionClause) -> Result<bool, ScriptError> {
        Ok(ctx.region().contains(ctx.world.player.position))
    }
}

/// The player has just moved into the script region.
///
/// Remembers the player's position per clause and is true on the first
/// evaluation after the player arrived on a new tile inside the region. It is
/// false on the very first evaluation, so standing on the tile when the map
/// loads does not count.
pub struct PlayerMoved;

impl Condition for PlayerMoved {
    fn name(&self) -> &'static str {
        "player_moved"
    }

    fn trigger(&self) -> TriggerMode {
        TriggerMode::Level
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, _clause: &ConditionClause) -> Result<bool, ScriptError> {
        let position = ctx.world.player.position;
        let moved = match ctx.recall(self.name()) {
            Some(PersistValue::Position(last)) => *last != position,
            _ => false,
        };
        ctx.remember(self.name(), PersistValue::Position(position));
        Ok(moved && ctx.region().contains(position))
    }
}

/// The tile in front of the player is inside the script region.
pub struct PlayerFacingTile;

impl Condition for PlayerFacingTile {
    fn name(&self) -> &'static str {
        "player_facing_tile"
    }

    fn test(&self, ctx: &mut ConditionContext<'_>, _clause: &ConditionClause) -> Result<bool, ScriptError> {
        Ok(ctx.region().contains(ctx.world.player.facing_tile()))
    }
}
