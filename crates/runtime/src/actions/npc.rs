use game_core::{ActionClause, Character, Direction, PLAYER_SLUG, ScriptError};
use tracing::{debug, warn};

use super::{invalid, position_param};
use crate::event::{Action, ActionContext, ActionStart};

/// Places an NPC on the map: `spawn_npc maple,3,4`.
///
/// An NPC already using the slug is replaced.
pub struct SpawnNpc;

impl Action for SpawnNpc {
    fn name(&self) -> &'static str {
        "spawn_npc"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let slug = clause.param(0)?;
        if slug == PLAYER_SLUG {
            return Err(invalid(clause, 0, "the player cannot be spawned"));
        }
        let position = position_param(clause, 1)?;
        if !ctx.world.boundaries.is_within_boundaries(position) {
            return Err(ScriptError::OutOfBounds(position));
        }
        if ctx.world.npcs.insert(Character::new(slug, position)).is_some() {
            warn!(target: "runtime::events", npc = slug, "replaced an existing npc");
        }
        Ok(ActionStart::Complete)
    }
}

/// Removes an NPC from the map: `remove_npc maple`.
pub struct RemoveNpc;

impl Action for RemoveNpc {
    fn name(&self) -> &'static str {
        "remove_npc"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let slug = clause.param(0)?;
        if ctx.world.npcs.remove(slug).is_none() {
            debug!(target: "runtime::events", npc = slug, "npc to remove was not on the map");
        }
        Ok(ActionStart::Complete)
    }
}

/// Turns a character: `npc_face maple,left`. `player` turns the player.
pub struct NpcFace;

impl Action for NpcFace {
    fn name(&self) -> &'static str {
        "npc_face"
    }

    fn actor(&self, clause: &ActionClause) -> Option<String> {
        clause.opt_param(0).map(str::to_string)
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let slug = clause.param(0)?;
        let direction = clause.parse_param::<Direction>(1)?;
        ctx.world.require_character(slug)?.facing = direction;
        Ok(ActionStart::Complete)
    }
}
