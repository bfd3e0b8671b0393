//! Screen/scene state stack.
//!
//! A [`State`] is one interactive screen (world map, combat, menu, dialog).
//! The [`StateManager`] owns a registry of named state factories and the
//! runtime stack of instances, and fires the lifecycle hooks on every
//! transition:
//!
//! ```text
//! constructed ─► startup ─► active ⇄ paused ─► shutdown ─► dropped
//! ```
//!
//! `pause` fires when another state is pushed on top, `resume` when the state
//! becomes the top again after the layer above it is popped.
mod manager;

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use game_core::{InputEvent, StateArgs, Tick, World};
use strum::{AsRefStr, Display};

pub use manager::{StateEntry, StateFactory, StateManager};

/// Identity of a state instance. Never reused within a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u64);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

bitflags! {
    /// Stack behavior of a state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// States below this one stop receiving updates.
        const BLOCKING = 1 << 0;
        /// States below this one are still drawn.
        const TRANSPARENT = 1 << 1;
        /// Never cuts the draw pass short, even when opaque. Used by transitions.
        const FORCE_DRAW = 1 << 2;
        /// Screen transition; delayed teleports wait for it to end.
        const TRANSITION = 1 << 3;
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        StateFlags::BLOCKING
    }
}

/// Lifecycle flag of a stack entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Lifecycle {
    /// Constructed, `startup` not yet run.
    Dormant,
    /// Top of the stack, or below a non-blocking state.
    Active,
    /// Covered by another state.
    Paused,
}

/// Context lent to states while they handle input or update.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub tick: Tick,
    /// Wall time since the previous tick.
    pub dt: Duration,
}

/// A screen/mode managed by the [`StateManager`].
///
/// Every hook has a no-op default so simple states only implement what they
/// need. The manager never inspects anything beyond this trait.
pub trait State {
    /// Stack behavior flags; read on every tick.
    fn flags(&self) -> StateFlags {
        StateFlags::default()
    }

    /// Called once, right after construction, with the push arguments.
    fn startup(&mut self, _args: &StateArgs) {}

    /// Called when the state becomes the top again.
    fn resume(&mut self) {}

    /// Called when another state is pushed on top.
    fn pause(&mut self) {}

    /// Called every tick while the state is updated.
    fn update(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Handles an input event. Return `None` to consume it, or the event to
    /// pass it to the next state down (and finally to the event engine).
    fn get_event(&mut self, _ctx: &mut TickContext<'_>, event: InputEvent) -> Option<InputEvent> {
        Some(event)
    }

    /// Called once when the state is removed; the instance is dropped afterwards.
    fn shutdown(&mut self) {}
}
