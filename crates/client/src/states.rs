//! Screens of the headless client.
use game_core::{Button, Direction, EngineConfig, InputEvent, StateArgs, StateRequest};
use runtime::{Game, State, StateFlags, TickContext};
use tracing::info;

/// Ticks the screen transition lasts.
pub const TRANSITION_TICKS: u32 = 4;

/// Registers the overworld under the event host name (or `"world"`), and the
/// dialog and transition screens under the names the engine pushes.
pub fn register_states(game: &mut Game, config: &EngineConfig) -> runtime::Result<String> {
    let world = config
        .event_host
        .clone()
        .unwrap_or_else(|| "world".to_string());
    game.register_state(world.clone(), || Overworld)?;
    game.register_state(config.dialog_state.clone(), DialogBox::default)?;

    let transition = config.transition_state.clone();
    game.register_state(config.transition_state.clone(), move || {
        Transition::new(transition.clone())
    })?;
    Ok(world)
}

fn direction(button: Button) -> Option<Direction> {
    match button {
        Button::Up => Some(Direction::Up),
        Button::Down => Some(Direction::Down),
        Button::Left => Some(Direction::Left),
        Button::Right => Some(Direction::Right),
        _ => None,
    }
}

/// The walkable map. Arrows walk the player one tile, `start` quits;
/// everything else falls through to the event engine.
pub struct Overworld;

impl State for Overworld {
    fn get_event(&mut self, ctx: &mut TickContext<'_>, event: InputEvent) -> Option<InputEvent> {
        if !event.pressed {
            return Some(event);
        }
        if event.button == Button::Start {
            info!(target: "overworld", "quit requested");
            ctx.world.request_state(StateRequest::Pop);
            return None;
        }
        let Some(step) = direction(event.button) else {
            return Some(event);
        };
        let player = &mut ctx.world.player;
        if !player.is_moving() {
            player.facing = step;
            player.walk(step, 1);
        }
        None
    }
}

/// Modal text box. Swallows all input; `a` closes it.
#[derive(Default)]
pub struct DialogBox {
    text: String,
}

impl State for DialogBox {
    fn flags(&self) -> StateFlags {
        StateFlags::BLOCKING | StateFlags::TRANSPARENT
    }

    fn startup(&mut self, args: &StateArgs) {
        self.text = args.get("text").unwrap_or_default().to_string();
        info!(target: "overworld", text = %self.text, "dialog opened");
    }

    fn get_event(&mut self, ctx: &mut TickContext<'_>, event: InputEvent) -> Option<InputEvent> {
        if event.pressed && event.button == Button::A {
            ctx.world.request_state(StateRequest::Pop);
        }
        None
    }

    fn shutdown(&mut self) {
        info!(target: "overworld", text = %self.text, "dialog closed");
    }
}

/// Screen fade. Removes itself after [`TRANSITION_TICKS`] updates.
pub struct Transition {
    name: String,
    frames: u32,
}

impl Transition {
    pub fn new(name: String) -> Self {
        Self { name, frames: 0 }
    }
}

impl State for Transition {
    fn flags(&self) -> StateFlags {
        StateFlags::BLOCKING | StateFlags::FORCE_DRAW | StateFlags::TRANSITION
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.frames += 1;
        if self.frames == TRANSITION_TICKS {
            ctx.world
                .request_state(StateRequest::PopNamed(self.name.clone()));
        }
    }

    fn get_event(&mut self, _ctx: &mut TickContext<'_>, _event: InputEvent) -> Option<InputEvent> {
        None
    }
}
