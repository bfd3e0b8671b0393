//! Tick driver composing the state stack, the event engine and the world.

use std::collections::HashMap;
use std::time::Duration;

use game_core::{
    ActionClause, BoundaryChecker, ConditionClause, EngineConfig, EventPersist, InputEvent,
    MapDefinition, ScriptError, StateArgs, StateRequest, Teleport, Tick, World,
};
use tracing::{debug, error, info, warn};

use crate::error::{Result, StackError, TeleportError};
use crate::event::{ActionStart, EngineReport, EventEngine, ScriptRegistry};
use crate::state::{State, StateFlags, StateId, StateManager, TickContext};

/// What happened during one [`Game::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// `None` when the event host was not on the stack and scripts did not run.
    pub events: Option<EngineReport>,
    /// Script-requested transitions that failed. Already logged.
    pub stack_errors: Vec<StackError>,
    /// Teleports that failed. Already logged.
    pub teleport_errors: Vec<TeleportError>,
}

/// A running session: the state stack, the event engine, the world and the
/// map library.
///
/// Each [`Game::tick`] runs, in order:
///
/// 1. input routing through the state stack (top down)
/// 2. state updates
/// 3. character movement
/// 4. the event engine, if its host state is on the stack
/// 5. state transitions requested during the tick
/// 6. pending teleports
///
/// Nothing inside a tick propagates an error to the caller; failures are
/// logged and returned in the [`TickReport`].
pub struct Game {
    states: StateManager,
    engine: EventEngine,
    world: World,
    persist: EventPersist,
    maps: HashMap<String, MapDefinition>,
    tick: Tick,
}

impl Game {
    /// Create a new game builder
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn engine(&self) -> &EventEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EventEngine {
        &mut self.engine
    }

    pub fn persist(&self) -> &EventPersist {
        &self.persist
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    /// True once the last state has been popped.
    pub fn is_done(&self) -> bool {
        self.states.is_empty()
    }

    pub fn add_map(&mut self, map: MapDefinition) {
        self.maps.insert(map.name.clone(), map);
    }

    pub fn map(&self, name: &str) -> Option<&MapDefinition> {
        self.maps.get(name)
    }

    pub fn register_state<F, S>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> S + 'static,
        S: State + 'static,
    {
        self.states.register_state(name, factory)
    }

    pub fn push_state(&mut self, name: &str, args: StateArgs) -> Result<StateId> {
        let id = self.states.push_state(name, args)?;
        self.refresh_snapshot();
        Ok(id)
    }

    /// Pops `target` (or the top) and cancels the script chains it hosted.
    pub fn pop_state(&mut self, target: Option<StateId>) -> Result<StateId> {
        let id = self.states.pop_state(target)?;
        self.engine.cancel_owned_by(id, &mut self.world);
        self.refresh_snapshot();
        Ok(id)
    }

    pub fn pop_state_named(&mut self, name: &str) -> Result<StateId> {
        let id = self.states.pop_state_named(name)?;
        self.engine.cancel_owned_by(id, &mut self.world);
        self.refresh_snapshot();
        Ok(id)
    }

    /// Replaces the top state and cancels the script chains it hosted.
    pub fn replace_state(&mut self, name: &str, args: StateArgs) -> Result<StateId> {
        let outgoing = self.states.current_state();
        let id = self.states.replace_state(name, args)?;
        if let Some(outgoing) = outgoing {
            self.engine.cancel_owned_by(outgoing, &mut self.world);
        }
        self.refresh_snapshot();
        Ok(id)
    }

    pub fn queue_state(&mut self, name: &str, args: StateArgs) -> Result<()> {
        self.states.queue_state(name, args)
    }

    /// Switches to the map `name`: running scripts are cancelled, the world
    /// and event-persistent storage are reset and the map's scripts loaded.
    pub fn load_map(&mut self, name: &str) -> std::result::Result<(), TeleportError> {
        let map = self
            .maps
            .get(name)
            .cloned()
            .ok_or_else(|| TeleportError::UnknownMap(name.to_string()))?;
        self.engine.unload(&mut self.world);
        self.world.load_map(&map);
        self.persist.clear();
        self.engine.load_scripts(map.scripts, &mut self.world);
        info!(
            target: "runtime::game",
            map = name,
            width = map.size.width,
            height = map.size.height,
            npcs = map.npcs.len(),
            "map loaded"
        );
        Ok(())
    }

    /// Tests one condition clause against the current world, outside any script.
    pub fn check_condition(
        &mut self,
        clause: &ConditionClause,
    ) -> std::result::Result<bool, ScriptError> {
        self.engine
            .check_condition(clause, &self.world, &mut self.persist)
    }

    /// Starts one action clause outside any script. Requests it makes are
    /// applied at the end of the next tick.
    pub fn execute_action(
        &mut self,
        clause: &ActionClause,
    ) -> std::result::Result<ActionStart, ScriptError> {
        self.engine.execute_action(clause, &mut self.world)
    }

    /// Runs one tick with the input events sampled for it.
    pub fn tick(&mut self, dt: Duration, inputs: &[InputEvent]) -> TickReport {
        self.tick = self.tick + 1;
        let tick = self.tick;
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        self.world.input.clear();
        for &event in inputs {
            let mut ctx = TickContext {
                world: &mut self.world,
                tick,
                dt,
            };
            if let Some(event) = self.states.dispatch_event(&mut ctx, event) {
                self.world.input.push(event);
            }
        }

        let mut ctx = TickContext {
            world: &mut self.world,
            tick,
            dt,
        };
        self.states.update(&mut ctx);
        self.world.advance_movement();

        if let Some(owner) = self.event_owner() {
            let events = self.engine.update(&mut self.world, &mut self.persist, owner);
            report.events = Some(events);
        }

        self.apply_requests(&mut report);
        self.apply_teleports(&mut report);
        self.refresh_snapshot();

        if !report.stack_errors.is_empty() || !report.teleport_errors.is_empty() {
            debug!(
                target: "runtime::game",
                %tick,
                stack_errors = report.stack_errors.len(),
                teleport_errors = report.teleport_errors.len(),
                "tick finished with errors"
            );
        }
        report
    }

    /// Owner to record on chains started this tick.
    ///
    /// `None` means the engine does not run; `Some(None)` runs it unowned.
    fn event_owner(&self) -> Option<Option<StateId>> {
        match &self.engine.config().event_host {
            None => Some(None),
            Some(host) => self
                .states
                .get_state_by_name(host)
                .map(|entry| Some(entry.id())),
        }
    }

    fn apply_requests(&mut self, report: &mut TickReport) {
        let requests = std::mem::take(&mut self.world.state_requests);
        for request in requests {
            debug!(target: "runtime::game", ?request, "applying state request");
            let result = match request {
                StateRequest::Push { name, args } => self.push_state(&name, args).map(drop),
                StateRequest::Pop => self.pop_state(None).map(drop),
                StateRequest::PopNamed(name) => self.pop_state_named(&name).map(drop),
                StateRequest::Replace { name, args } => self.replace_state(&name, args).map(drop),
                StateRequest::Queue { name, args } => self.queue_state(&name, args),
            };
            if let Err(err) = result {
                error!(target: "runtime::game", error = %err, "state request failed");
                report.stack_errors.push(err);
            }
        }
    }

    fn apply_teleports(&mut self, report: &mut TickReport) {
        if let Some(teleport) = self.world.pending_teleport.take() {
            if let Err(err) = self.teleport(&teleport) {
                report.teleport_errors.push(err);
            }
        }
        if self.world.delayed_teleport.is_some() && !self.states.any_with_flags(StateFlags::TRANSITION) {
            if let Some(teleport) = self.world.delayed_teleport.take() {
                if let Err(err) = self.teleport(&teleport) {
                    report.teleport_errors.push(err);
                }
            }
        }
    }

    fn teleport(&mut self, teleport: &Teleport) -> std::result::Result<(), TeleportError> {
        let result = self.move_player(teleport);
        match &result {
            Ok(()) => info!(
                target: "runtime::game",
                map = %teleport.map,
                position = %teleport.position,
                "player teleported"
            ),
            Err(err) => warn!(target: "runtime::game", error = %err, "teleport failed"),
        }
        result
    }

    fn move_player(&mut self, teleport: &Teleport) -> std::result::Result<(), TeleportError> {
        if self.world.map_name.as_deref() != Some(teleport.map.as_str()) {
            let size = self
                .maps
                .get(&teleport.map)
                .map(|map| map.size)
                .ok_or_else(|| TeleportError::UnknownMap(teleport.map.clone()))?;
            let mut boundaries = BoundaryChecker::new();
            boundaries.update_boundaries(size);
            if !boundaries.is_within_boundaries(teleport.position) {
                return Err(TeleportError::OutOfBounds(
                    teleport.position,
                    teleport.map.clone(),
                ));
            }
            self.load_map(&teleport.map)?;
        }
        self.world
            .warp_player(teleport.position)
            .map_err(|_| TeleportError::OutOfBounds(teleport.position, teleport.map.clone()))
    }

    fn refresh_snapshot(&mut self) {
        self.world.active_states = self.states.active_state_names();
    }
}

/// Builder for [`Game`].
pub struct GameBuilder {
    registry: Option<ScriptRegistry>,
    config: EngineConfig,
    world: World,
    maps: Vec<MapDefinition>,
}

impl GameBuilder {
    fn new() -> Self {
        Self {
            registry: None,
            config: EngineConfig::default(),
            world: World::new(),
            maps: Vec::new(),
        }
    }

    /// Override engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the condition/action registry.
    ///
    /// If not provided, the registry with all built-ins is used.
    pub fn registry(mut self, registry: ScriptRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Provide the initial world (variables, inventory, player position)
    pub fn world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    /// Add a map to the map library
    pub fn map(mut self, map: MapDefinition) -> Self {
        self.maps.push(map);
        self
    }

    pub fn maps(mut self, maps: impl IntoIterator<Item = MapDefinition>) -> Self {
        self.maps.extend(maps);
        self
    }

    pub fn build(self) -> Game {
        let registry = self.registry.unwrap_or_else(ScriptRegistry::with_builtins);
        Game {
            states: StateManager::new(),
            engine: EventEngine::new(registry, self.config),
            world: self.world,
            persist: EventPersist::new(),
            maps: self
                .maps
                .into_iter()
                .map(|map| (map.name.clone(), map))
                .collect(),
            tick: Tick::ZERO,
        }
    }
}
