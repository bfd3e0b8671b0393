use game_core::{ActionClause, ScriptError, StateArgs, StateRequest, World};

use super::state_args;
use crate::event::{Action, ActionContext, ActionStart, ActionStatus, BlockingAction};

/// Pushes a state: `push_state shop,stock=potions`.
pub struct PushState;

impl Action for PushState {
    fn name(&self) -> &'static str {
        "push_state"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let name = clause.param(0)?.to_string();
        let args = state_args(clause, 1)?;
        ctx.world.request_state(StateRequest::Push { name, args });
        Ok(ActionStart::Complete)
    }
}

/// Pops the top state, or the topmost state with the given name: `pop_state [name]`.
pub struct PopState;

impl Action for PopState {
    fn name(&self) -> &'static str {
        "pop_state"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let request = match clause.opt_param(0) {
            Some(name) => StateRequest::PopNamed(name.to_string()),
            None => StateRequest::Pop,
        };
        ctx.world.request_state(request);
        Ok(ActionStart::Complete)
    }
}

/// Replaces the top state: `replace_state combat,opponent=maple`.
pub struct ReplaceState;

impl Action for ReplaceState {
    fn name(&self) -> &'static str {
        "replace_state"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        let name = clause.param(0)?.to_string();
        let args = state_args(clause, 1)?;
        ctx.world.request_state(StateRequest::Replace { name, args });
        Ok(ActionStart::Complete)
    }
}

/// Opens the dialog state and blocks until it is closed: `dialog Hello there!`.
///
/// The parameters are joined back into one text and passed to the dialog
/// state as its `text` argument.
pub struct Dialog;

impl Dialog {
    pub const TEXT_ARG: &'static str = "text";
}

impl Action for Dialog {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn start(&self, ctx: &mut ActionContext<'_>, clause: &ActionClause) -> Result<ActionStart, ScriptError> {
        clause.param(0)?;
        let text = clause.parameters.join(", ");
        let state = ctx.config.dialog_state.clone();
        ctx.world.request_state(StateRequest::Push {
            name: state.clone(),
            args: StateArgs::new().with(Self::TEXT_ARG, text),
        });
        let open = open_count(ctx.world, &state);
        Ok(ActionStart::blocking(AwaitClose {
            state,
            open,
            seen: false,
        }))
    }
}

fn open_count(world: &World, state: &str) -> usize {
    world.active_states.iter().filter(|name| *name == state).count()
}

/// Waits for a pushed state to appear on the stack and then leave it.
///
/// Instances of the same state that were already open when the action started
/// are not counted, so an outer dialog staying open does not hold the script.
struct AwaitClose {
    state: String,
    open: usize,
    seen: bool,
}

impl BlockingAction for AwaitClose {
    fn poll(&mut self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ScriptError> {
        if open_count(ctx.world, &self.state) > self.open {
            self.seen = true;
            return Ok(ActionStatus::Running);
        }
        if self.seen {
            Ok(ActionStatus::Finished)
        } else {
            Err(ScriptError::StateNotActive(self.state.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::start;
    use game_core::{EngineConfig, EventScript, Region, ScriptId, Tick, World};

    #[test]
    fn stack_actions_queue_requests() {
        let mut world = World::new();
        start(&PushState, &mut world, "push_state shop,stock=potions").unwrap();
        start(&PopState, &mut world, "pop_state").unwrap();
        start(&PopState, &mut world, "pop_state shop").unwrap();
        start(&ReplaceState, &mut world, "replace_state combat").unwrap();

        assert_eq!(
            world.state_requests,
            vec![
                StateRequest::Push {
                    name: "shop".into(),
                    args: StateArgs::new().with("stock", "potions"),
                },
                StateRequest::Pop,
                StateRequest::PopNamed("shop".into()),
                StateRequest::Replace {
                    name: "combat".into(),
                    args: StateArgs::new(),
                },
            ]
        );
    }

    #[test]
    fn dialog_blocks_until_the_state_closes() {
        let mut world = World::new();
        let started = start(&Dialog, &mut world, "dialog Hello, traveler").unwrap();
        assert_eq!(
            world.state_requests,
            vec![StateRequest::Push {
                name: "dialog".into(),
                args: StateArgs::new().with("text", "Hello, traveler"),
            }]
        );
        let ActionStart::Blocking(mut waiting) = started else {
            panic!("dialog should block");
        };

        let config = EngineConfig::default();
        let script = EventScript::new(ScriptId(0), "talk", Region::tile(0, 0));
        let mut poll = |world: &mut World| {
            let mut ctx = ActionContext {
                world,
                config: &config,
                script: &script,
                tick: Tick::ZERO,
            };
            waiting.poll(&mut ctx)
        };

        world.active_states = vec!["dialog".into(), "world".into()];
        assert_eq!(poll(&mut world), Ok(ActionStatus::Running));
        world.active_states = vec!["world".into()];
        assert_eq!(poll(&mut world), Ok(ActionStatus::Finished));
    }

    #[test]
    fn dialog_ignores_an_already_open_dialog() {
        let mut world = World::new();
        world.active_states = vec!["dialog".into(), "world".into()];
        let ActionStart::Blocking(mut waiting) = start(&Dialog, &mut world, "dialog Again").unwrap() else {
            panic!("dialog should block");
        };

        let config = EngineConfig::default();
        let script = EventScript::new(ScriptId(0), "talk", Region::tile(0, 0));
        let mut poll = |world: &mut World| {
            let mut ctx = ActionContext {
                world,
                config: &config,
                script: &script,
                tick: Tick::ZERO,
            };
            waiting.poll(&mut ctx)
        };

        world.active_states = vec!["dialog".into(), "dialog".into(), "world".into()];
        assert_eq!(poll(&mut world), Ok(ActionStatus::Running));
        world.active_states = vec!["dialog".into(), "world".into()];
        assert_eq!(poll(&mut world), Ok(ActionStatus::Finished));
    }

    #[test]
    fn dialog_that_never_opened_fails() {
        let mut world = World::new();
        let ActionStart::Blocking(mut waiting) = start(&Dialog, &mut world, "dialog Hi").unwrap() else {
            panic!("dialog should block");
        };
        let config = EngineConfig::default();
        let script = EventScript::new(ScriptId(0), "talk", Region::tile(0, 0));
        let mut ctx = ActionContext {
            world: &mut world,
            config: &config,
            script: &script,
            tick: Tick::ZERO,
        };
        assert_eq!(
            waiting.poll(&mut ctx),
            Err(ScriptError::StateNotActive("dialog".into()))
        );
    }
}
