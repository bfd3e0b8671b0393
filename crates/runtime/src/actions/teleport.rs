use game_core::{ActionClause, ScriptError, StateArgs, StateRequest};

use super::position_param;
use crate::event::{Action, ActionContext, ActionStart};

fn teleport_param(clause: &ActionClause) -> Result<game_core::Teleport, ScriptError> {
    let map = clause.param(0)?;
    let position = position_param(clause, 1)?;
    Ok(game_core::Teleport::new(map, position))
}

/// Moves the player at the end of the tick: `teleport house,3,4`.
///
/// A different map is loaded first; the same map only warps the player.
pub struct Teleport;

impl Action for Teleport {
    fn name(&self) -> &'static str {
        "teleport"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        ctx.world.pending_teleport = Some(teleport_param(clause)?);
        Ok(ActionStart::Complete)
    }
}

/// Pushes the transition state and teleports once it has ended:
/// `transition_teleport house,3,4`.
pub struct TransitionTeleport;

impl Action for TransitionTeleport {
    fn name(&self) -> &'static str {
        "transition_teleport"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let teleport = teleport_param(clause)?;
        ctx.world.delayed_teleport = Some(teleport);
        ctx.world.request_state(StateRequest::Push {
            name: ctx.config.transition_state.clone(),
            args: StateArgs::new(),
        });
        Ok(ActionStart::Complete)
    }
}
