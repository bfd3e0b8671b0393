use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use game_core::{InputEvent, StateArgs};
use tracing::{debug, error};

use super::{Lifecycle, State, StateFlags, StateId, TickContext};
use crate::error::{Result, StackError};

/// Constructor registered for a state name.
pub type StateFactory = Box<dyn Fn() -> Box<dyn State>>;

/// One instance on the stack.
pub struct StateEntry {
    id: StateId,
    name: String,
    lifecycle: Lifecycle,
    state: Box<dyn State>,
}

impl StateEntry {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn flags(&self) -> StateFlags {
        self.state.flags()
    }

    pub fn state(&self) -> &dyn State {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> &mut dyn State {
        self.state.as_mut()
    }
}

impl fmt::Debug for StateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("lifecycle", &self.lifecycle)
            .field("flags", &self.flags())
            .finish()
    }
}

/// Registry of named state factories plus the runtime stack of instances.
///
/// Index 0 of the stack is the top: the state receiving input first. Usage
/// errors (empty pop, unknown name) are returned as [`StackError`] and logged
/// at `error` level; the manager is left unchanged when an operation fails.
#[derive(Default)]
pub struct StateManager {
    registry: BTreeMap<String, StateFactory>,
    stack: Vec<StateEntry>,
    queue: VecDeque<(String, StateArgs)>,
    next_id: u64,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state factory under `name`.
    ///
    /// Names are unique: registering the same name twice is rejected.
    pub fn register_state<F, S>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> S + 'static,
        S: State + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(StackError::EmptyName);
        }
        if self.registry.contains_key(&name) {
            return Err(StackError::DuplicateState(name));
        }
        debug!(target: "runtime::states", state = %name, "registered state");
        self.registry
            .insert(name, Box::new(move || Box::new(factory()) as Box<dyn State>));
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Names of all registered states, sorted.
    pub fn query_all_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.keys().map(String::as_str)
    }

    /// Constructs `name`, starts it and makes it the new top.
    ///
    /// The previous top, if any, is paused.
    pub fn push_state(&mut self, name: &str, args: StateArgs) -> Result<StateId> {
        self.start_state(name, args, true)
    }

    /// Pops `target`, or the top state when `None`.
    ///
    /// The removed state is shut down. If it was the top, a queued state
    /// takes its place when one is waiting; otherwise the new top resumes.
    pub fn pop_state(&mut self, target: Option<StateId>) -> Result<StateId> {
        if self.stack.is_empty() {
            error!(target: "runtime::states", "attempted to pop a state while the stack is empty");
            return Err(StackError::EmptyStack);
        }
        let index = match target {
            None => 0,
            Some(id) => self.position(id).ok_or_else(|| {
                error!(target: "runtime::states", state = %id, "attempted to pop a state that is not active");
                StackError::NotActive(id)
            })?,
        };

        let id = self.remove_at(index);
        if index == 0 {
            if let Some((name, args)) = self.queue.pop_front() {
                self.start_state(&name, args, false)?;
            } else if let Some(top) = self.stack.first_mut() {
                top.state.resume();
                top.lifecycle = Lifecycle::Active;
                debug!(target: "runtime::states", state = %top.name, id = %top.id, "resumed state");
            }
        }
        Ok(id)
    }

    /// Pops the topmost instance of the state named `name`.
    pub fn pop_state_named(&mut self, name: &str) -> Result<StateId> {
        let id = self.get_state_by_name(name).map(StateEntry::id).ok_or_else(|| {
            error!(target: "runtime::states", state = name, "attempted to pop a state that is not active");
            StackError::NameNotActive(name.to_string())
        })?;
        self.pop_state(Some(id))
    }

    /// Removes the top state and pushes `name` in its place.
    ///
    /// The outgoing state is shut down before the incoming one starts, and is
    /// never paused. States further down keep their lifecycle.
    pub fn replace_state(&mut self, name: &str, args: StateArgs) -> Result<StateId> {
        if !self.is_registered(name) {
            error!(target: "runtime::states", state = name, "cannot find state");
            return Err(StackError::UnknownState(name.to_string()));
        }
        if self.stack.is_empty() {
            error!(target: "runtime::states", state = name, "attempted to replace a state while the stack is empty");
            return Err(StackError::EmptyStack);
        }
        self.remove_at(0);
        self.start_state(name, args, false)
    }

    /// Queues `name` to be started in place of the top state when it is next popped.
    pub fn queue_state(&mut self, name: &str, args: StateArgs) -> Result<()> {
        if !self.is_registered(name) {
            error!(target: "runtime::states", state = name, "cannot find state");
            return Err(StackError::UnknownState(name.to_string()));
        }
        debug!(target: "runtime::states", state = name, "queued state");
        self.queue.push_back((name.to_string(), args));
        Ok(())
    }

    pub fn queued_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.queue.iter().map(|(name, _)| name.as_str())
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.stack.first().map(StateEntry::id)
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.stack.first().map(StateEntry::name)
    }

    /// The full stack, topmost first.
    pub fn active_states(&self) -> &[StateEntry] {
        &self.stack
    }

    /// Names of the stacked states, topmost first.
    pub fn active_state_names(&self) -> Vec<String> {
        self.stack.iter().map(|e| e.name.clone()).collect()
    }

    /// Topmost instance of the state named `name`.
    pub fn get_state_by_name(&self, name: &str) -> Option<&StateEntry> {
        self.stack.iter().find(|e| e.name == name)
    }

    pub fn state(&self, id: StateId) -> Option<&StateEntry> {
        self.stack.iter().find(|e| e.id == id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut StateEntry> {
        self.stack.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Passes `event` down the stack until a state consumes it.
    ///
    /// Returns the event if no state consumed it.
    pub fn dispatch_event(
        &mut self,
        ctx: &mut TickContext<'_>,
        event: InputEvent,
    ) -> Option<InputEvent> {
        let mut event = event;
        for entry in &mut self.stack {
            event = entry.state.get_event(ctx, event)?;
        }
        Some(event)
    }

    /// Updates states from the top down, stopping after the first blocking one.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        for entry in &mut self.stack {
            entry.state.update(ctx);
            if entry.state.flags().contains(StateFlags::BLOCKING) {
                break;
            }
        }
    }

    /// States to draw this frame, bottom-up.
    ///
    /// Walks down from the top and stops after the first state that is neither
    /// transparent nor force-drawn.
    pub fn visible_states(&self) -> Vec<&StateEntry> {
        let see_through = StateFlags::TRANSPARENT | StateFlags::FORCE_DRAW;
        let mut visible = Vec::new();
        for entry in &self.stack {
            visible.push(entry);
            if !entry.flags().intersects(see_through) {
                break;
            }
        }
        visible.reverse();
        visible
    }

    /// True if any stacked state carries `flags`.
    pub fn any_with_flags(&self, flags: StateFlags) -> bool {
        self.stack.iter().any(|e| e.flags().contains(flags))
    }

    fn start_state(&mut self, name: &str, args: StateArgs, pause_previous: bool) -> Result<StateId> {
        let Some(factory) = self.registry.get(name) else {
            error!(target: "runtime::states", state = name, "cannot find state");
            return Err(StackError::UnknownState(name.to_string()));
        };

        let id = StateId(self.next_id);
        self.next_id += 1;
        let mut entry = StateEntry {
            id,
            name: name.to_string(),
            lifecycle: Lifecycle::Dormant,
            state: factory(),
        };
        entry.state.startup(&args);

        if pause_previous {
            if let Some(previous) = self.stack.first_mut() {
                previous.state.pause();
                previous.lifecycle = Lifecycle::Paused;
                debug!(target: "runtime::states", state = %previous.name, id = %previous.id, "paused state");
            }
        }

        entry.lifecycle = Lifecycle::Active;
        self.stack.insert(0, entry);
        debug!(target: "runtime::states", state = name, %id, depth = self.stack.len(), "pushed state");
        Ok(id)
    }

    fn remove_at(&mut self, index: usize) -> StateId {
        let mut entry = self.stack.remove(index);
        entry.state.shutdown();
        debug!(target: "runtime::states", state = %entry.name, id = %entry.id, "popped state");
        entry.id
    }

    fn position(&self, id: StateId) -> Option<usize> {
        self.stack.iter().position(|e| e.id == id)
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("registered", &self.registry.keys().collect::<Vec<_>>())
            .field("stack", &self.stack)
            .field("queue", &self.queued_states().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Button, Tick, World};
    use std::time::Duration;

    struct Menu;

    impl State for Menu {
        fn flags(&self) -> StateFlags {
            StateFlags::BLOCKING | StateFlags::TRANSPARENT
        }

        fn get_event(&mut self, _ctx: &mut TickContext<'_>, event: InputEvent) -> Option<InputEvent> {
            (event.button != Button::B).then_some(event)
        }
    }

    struct Field;

    impl State for Field {}

    fn manager() -> StateManager {
        let mut states = StateManager::new();
        states.register_state("menu", || Menu).unwrap();
        states.register_state("field", || Field).unwrap();
        states
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let mut states = manager();
        assert_eq!(
            states.register_state("menu", || Menu),
            Err(StackError::DuplicateState("menu".into()))
        );
        assert_eq!(states.register_state("", || Menu), Err(StackError::EmptyName));
        assert_eq!(states.query_all_states().collect::<Vec<_>>(), vec!["field", "menu"]);
    }

    #[test]
    fn lifecycle_flags_follow_the_stack() {
        let mut states = manager();
        let field = states.push_state("field", StateArgs::new()).unwrap();
        let menu = states.push_state("menu", StateArgs::new()).unwrap();

        assert_eq!(states.state(field).unwrap().lifecycle(), Lifecycle::Paused);
        assert_eq!(states.state(menu).unwrap().lifecycle(), Lifecycle::Active);

        states.pop_state(None).unwrap();
        assert_eq!(states.state(field).unwrap().lifecycle(), Lifecycle::Active);
        assert!(!states.contains(menu));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut states = manager();
        let first = states.push_state("field", StateArgs::new()).unwrap();
        states.pop_state(None).unwrap();
        let second = states.push_state("field", StateArgs::new()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn consumed_events_stop_at_the_consumer() {
        let mut states = manager();
        states.push_state("field", StateArgs::new()).unwrap();
        states.push_state("menu", StateArgs::new()).unwrap();

        let mut world = World::new();
        let mut ctx = TickContext {
            world: &mut world,
            tick: Tick::ZERO,
            dt: Duration::ZERO,
        };
        assert_eq!(states.dispatch_event(&mut ctx, InputEvent::press(Button::B)), None);
        assert_eq!(
            states.dispatch_event(&mut ctx, InputEvent::press(Button::A)),
            Some(InputEvent::press(Button::A))
        );
    }

    #[test]
    fn pop_named_targets_the_topmost_match() {
        let mut states = manager();
        states.push_state("field", StateArgs::new()).unwrap();
        states.push_state("menu", StateArgs::new()).unwrap();

        states.pop_state_named("field").unwrap();
        assert_eq!(states.active_state_names(), vec!["menu"]);
        assert_eq!(
            states.pop_state_named("field"),
            Err(StackError::NameNotActive("field".into()))
        );
    }
}
