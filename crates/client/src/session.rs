//! Fixed-step session loop.
use std::time::Duration;

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::{EngineConfig, MapDefinition, Position, StateArgs};
use runtime::{Game, ScriptRegistry, TickReport};
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::input::InputPlan;
use crate::states::register_states;

/// Duration of one tick at 60 ticks per second.
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Outcome of [`Session::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    /// True when the last state was popped before the tick limit.
    pub finished: bool,
    pub map: Option<String>,
    pub player: Position,
    pub variables: Vec<(String, String)>,
    pub inventory: Vec<(String, u32)>,
    pub script_failures: usize,
    pub stack_errors: usize,
    pub teleport_errors: usize,
}

/// A game plus its scripted input, run until the game ends or the tick
/// limit is reached.
pub struct Session {
    game: Game,
    plan: InputPlan,
    max_ticks: u64,
    script_failures: usize,
    stack_errors: usize,
    teleport_errors: usize,
}

impl Session {
    /// Loads content from `config.content_dir` and starts on `config.start_map`.
    pub fn load(config: &ClientConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.content_dir);
        let engine_config = factory.load_config()?;
        let maps = factory.load_maps()?;
        let plan = InputPlan::parse(&config.inputs).context("invalid OVERWORLD_INPUTS")?;
        Self::new(engine_config, maps, &config.start_map, plan, config.max_ticks)
    }

    pub fn new(
        engine_config: EngineConfig,
        maps: Vec<MapDefinition>,
        start_map: &str,
        plan: InputPlan,
        max_ticks: u64,
    ) -> Result<Self> {
        let registry = ScriptRegistry::with_builtins();
        for map in &maps {
            for script in &map.scripts {
                for error in registry.validate(script) {
                    warn!(
                        target: "overworld",
                        map = %map.name,
                        script = %script.name,
                        %error,
                        "script will not run"
                    );
                }
            }
        }

        let mut game = Game::builder()
            .config(engine_config.clone())
            .registry(registry)
            .maps(maps)
            .build();
        let world = register_states(&mut game, &engine_config)?;

        game.load_map(start_map)
            .with_context(|| format!("cannot start on map `{start_map}`"))?;
        game.push_state(&world, StateArgs::new())?;
        info!(
            target: "overworld",
            map = start_map,
            host = %world,
            inputs = plan.remaining(),
            "session started"
        );

        Ok(Self {
            game,
            plan,
            max_ticks,
            script_failures: 0,
            stack_errors: 0,
            teleport_errors: 0,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Runs one tick with the next planned input.
    pub fn step(&mut self) -> TickReport {
        let inputs = self.plan.next_tick();
        let report = self.game.tick(FRAME, &inputs);

        if let Some(events) = &report.events {
            self.script_failures += events.failures.len();
            if !events.is_quiet() {
                debug!(
                    target: "overworld",
                    tick = %report.tick,
                    fired = ?events.fired,
                    finished = ?events.finished,
                    failures = events.failures.len(),
                    "scripts"
                );
            }
        }
        self.stack_errors += report.stack_errors.len();
        self.teleport_errors += report.teleport_errors.len();

        let draw: Vec<&str> = self
            .game
            .states()
            .visible_states()
            .iter()
            .map(|entry| entry.name())
            .collect();
        trace!(target: "overworld", tick = %report.tick, ?draw, "frame");
        report
    }

    /// Ticks until the game ends or the tick limit is reached.
    pub fn run(&mut self) -> SessionSummary {
        while !self.game.is_done() && self.game.tick_count().0 < self.max_ticks {
            self.step();
        }
        let summary = self.summary();
        info!(
            target: "overworld",
            ticks = summary.ticks,
            finished = summary.finished,
            map = ?summary.map,
            player = %summary.player,
            "session ended"
        );
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        let world = self.game.world();
        let mut variables: Vec<(String, String)> = world
            .variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        variables.sort();
        let mut inventory: Vec<(String, u32)> = world
            .player
            .inventory
            .iter()
            .map(|(item, quantity)| (item.to_string(), quantity))
            .collect();
        inventory.sort();

        SessionSummary {
            ticks: self.game.tick_count().0,
            finished: self.game.is_done(),
            map: world.map_name.clone(),
            player: world.player.position,
            variables,
            inventory,
            script_failures: self.script_failures,
            stack_errors: self.stack_errors,
            teleport_errors: self.teleport_errors,
        }
    }
}
