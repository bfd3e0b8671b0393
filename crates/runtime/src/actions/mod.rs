//! Built-in action types.
//!
//! Blocking actions are `npc_move`, `wait` and `dialog`; every other built-in
//! completes in the tick it starts. Actions that change the state stack or the
//! loaded map only queue a request on the world; the game driver applies it
//! after the engine pass.
mod items;
mod movement;
mod npc;
mod states;
mod teleport;
mod variables;

use std::sync::Arc;

pub use items::{AddItem, RemoveItem};
pub use movement::{NpcMove, Wait};
pub use npc::{NpcFace, RemoveNpc, SpawnNpc};
pub use states::{Dialog, PopState, PushState, ReplaceState};
pub use teleport::{Teleport, TransitionTeleport};
pub use variables::{ClearVariable, SetVariable, VariableMath};

use game_core::{ActionClause, Position, ScriptError, StateArgs};

use crate::event::Action;

pub(crate) fn builtin() -> Vec<Arc<dyn Action>> {
    vec![
        Arc::new(SetVariable),
        Arc::new(ClearVariable),
        Arc::new(VariableMath),
        Arc::new(AddItem),
        Arc::new(RemoveItem),
        Arc::new(SpawnNpc),
        Arc::new(RemoveNpc),
        Arc::new(NpcFace),
        Arc::new(NpcMove),
        Arc::new(Wait),
        Arc::new(Teleport),
        Arc::new(TransitionTeleport),
        Arc::new(PushState),
        Arc::new(PopState),
        Arc::new(ReplaceState),
        Arc::new(Dialog),
    ]
}

fn invalid(clause: &ActionClause, index: usize, reason: impl Into<String>) -> ScriptError {
    ScriptError::InvalidParameter {
        clause: clause.kind.clone(),
        index,
        reason: reason.into(),
    }
}

/// Reads a tile position from parameters `index` and `index + 1`.
fn position_param(clause: &ActionClause, index: usize) -> Result<Position, ScriptError> {
    Ok(Position::new(
        clause.parse_param(index)?,
        clause.parse_param(index + 1)?,
    ))
}

/// Splits `key<sep>value` parameter `index`.
fn pair_param<'a>(
    clause: &'a ActionClause,
    index: usize,
    sep: char,
) -> Result<(&'a str, &'a str), ScriptError> {
    let raw = clause.param(index)?;
    raw.split_once(sep)
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| invalid(clause, index, format!("expected `key{sep}value`, got `{raw}`")))
}

/// Collects `key=value` parameters from `start` on into state arguments.
fn state_args(clause: &ActionClause, start: usize) -> Result<StateArgs, ScriptError> {
    let mut args = StateArgs::new();
    for index in start..clause.parameters.len() {
        if clause.opt_param(index).is_none() {
            continue;
        }
        let (key, value) = pair_param(clause, index, '=')?;
        args.insert(key, value);
    }
    Ok(args)
}
