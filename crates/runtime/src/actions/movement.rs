use game_core::{ActionClause, Direction, ScriptError};

use super::invalid;
use crate::event::{Action, ActionContext, ActionStart, ActionStatus, BlockingAction};

/// Walks a character along a path: `npc_move maple,up 2,left,down 3`.
///
/// Each segment is a direction with an optional tile count, at most the
/// larger map dimension. The action blocks
/// until the character has stopped; it holds the character as its actor so
/// no other script can drive it meanwhile. If the character disappears
/// mid-walk the action fails and its script is re-armed.
pub struct NpcMove;

impl NpcMove {
    fn parse_path(clause: &ActionClause, limit: u32) -> Result<Vec<(Direction, u32)>, ScriptError> {
        let mut path = Vec::new();
        for index in 1..clause.parameters.len() {
            let Some(segment) = clause.opt_param(index) else {
                continue;
            };
            let mut words = segment.split_whitespace();
            let direction = words
                .next()
                .and_then(|d| d.parse::<Direction>().ok())
                .ok_or_else(|| invalid(clause, index, format!("`{segment}` has no direction")))?;
            let tiles = match words.next() {
                None => 1,
                Some(n) => n
                    .parse::<u32>()
                    .map_err(|e| invalid(clause, index, format!("`{segment}`: {e}")))?,
            };
            if tiles > limit {
                return Err(invalid(
                    clause,
                    index,
                    format!("`{segment}` is longer than the map ({limit} tiles)"),
                ));
            }
            if words.next().is_some() {
                return Err(invalid(clause, index, format!("`{segment}` is not `direction [tiles]`")));
            }
            path.push((direction, tiles));
        }
        Ok(path)
    }
}

impl Action for NpcMove {
    fn name(&self) -> &'static str {
        "npc_move"
    }

    fn actor(&self, clause: &ActionClause) -> Option<String> {
        clause.opt_param(0).map(str::to_string)
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let slug = clause.param(0)?;
        let size = ctx.world.map_size;
        let limit = u32::try_from(size.width.max(size.height)).unwrap_or(0);
        let path = Self::parse_path(clause, limit);
        let character = ctx.world.require_character(slug)?;
        let path = path?;
        if path.iter().all(|&(_, tiles)| tiles == 0) {
            return Ok(ActionStart::Complete);
        }
        for (direction, tiles) in path {
            character.walk(direction, tiles);
        }
        Ok(ActionStart::blocking(WalkPath {
            slug: slug.to_string(),
        }))
    }
}

struct WalkPath {
    slug: String,
}

impl BlockingAction for WalkPath {
    fn poll(&mut self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ScriptError> {
        let character = ctx
            .world
            .character(&self.slug)
            .ok_or_else(|| ScriptError::CharacterNotFound(self.slug.clone()))?;
        Ok(ActionStatus::from_done(!character.is_moving()))
    }

    fn cleanup(&mut self, ctx: &mut ActionContext<'_>) {
        if let Some(character) = ctx.world.character_mut(&self.slug) {
            character.stop();
        }
    }
}

/// Blocks its script for a number of ticks: `wait 30`.
pub struct Wait;

impl Action for Wait {
    fn name(&self) -> &'static str {
        "wait"
    }

    fn start(&self, _ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let ticks = clause.parse_param::<u32>(0)?;
        if ticks == 0 {
            return Ok(ActionStart::Complete);
        }
        Ok(ActionStart::blocking(Countdown { remaining: ticks }))
    }
}

struct Countdown {
    remaining: u32,
}

impl BlockingAction for Countdown {
    fn poll(&mut self, _ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ScriptError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(ActionStatus::from_done(self.remaining == 0))
    }
}
