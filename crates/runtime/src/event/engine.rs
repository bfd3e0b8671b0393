use std::collections::{HashMap, HashSet};

use game_core::{
    ActionClause, ConditionClause, ConditionKey, EngineConfig, ErrorSeverity, EventPersist,
    EventScript, GameError, Region, ScriptError, ScriptId, ScriptKind, ScriptLocation, Tick, World,
};
use tracing::{debug, error, info, warn};

use super::{
    ActionContext, ActionStart, BlockingAction, ConditionContext, ScriptRegistry, TriggerMode,
};
use crate::state::StateId;

/// Id reported by conditions and actions run through
/// [`EventEngine::check_condition`] and [`EventEngine::execute_action`].
pub const DIRECT_SCRIPT: ScriptId = ScriptId(u32::MAX);

/// Last evaluation of one condition clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMatch {
    /// Result of the condition test before the operator was applied.
    pub raw: bool,
    /// Clause result after the operator. `false` when the test failed.
    pub result: bool,
    /// Raw result of the evaluation before this one.
    pub previous_raw: Option<bool>,
}

/// A failure attributed to one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    pub location: ScriptLocation,
    pub error: ScriptError,
}

/// What happened during one engine tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReport {
    /// Scripts whose action chains were started this tick, in evaluation order.
    pub fired: Vec<ScriptId>,
    /// Scripts whose action chains ran to completion this tick.
    pub finished: Vec<ScriptId>,
    pub failures: Vec<ScriptFailure>,
}

impl EngineReport {
    pub fn is_quiet(&self) -> bool {
        self.fired.is_empty() && self.finished.is_empty() && self.failures.is_empty()
    }
}

/// A fired script working through its action list.
struct RunningScript {
    /// Index into the engine's script list.
    script: usize,
    id: ScriptId,
    action_index: usize,
    current: Option<Box<dyn BlockingAction>>,
    /// Tick the current blocking action started on.
    blocked_since: Tick,
    /// Actor the current blocking action holds.
    actor: Option<String>,
    /// State that was hosting the engine when the script fired.
    owner: Option<StateId>,
}

enum ChainStep {
    Pending,
    Finished,
    Failed(ScriptError),
}

struct Evaluation {
    satisfied: bool,
    level: bool,
}

/// Evaluates the event scripts of the loaded map, tick by tick.
///
/// Scripts are evaluated in load order. The engine keeps no world state of its
/// own beyond the partial-match table, the triggered set, running chains and
/// the busy-actor table; all of it is reset when scripts are (re)loaded.
pub struct EventEngine {
    registry: ScriptRegistry,
    config: EngineConfig,
    scripts: Vec<EventScript>,
    init_pending: bool,
    partial: HashMap<ConditionKey, PartialMatch>,
    triggered: HashSet<ScriptId>,
    running: Vec<RunningScript>,
    busy: HashMap<String, ScriptId>,
    /// Scripts whose unknown identifier was already logged since the last load.
    reported: HashSet<ScriptId>,
    tick: Tick,
}

impl EventEngine {
    pub fn new(registry: ScriptRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            scripts: Vec::new(),
            init_pending: false,
            partial: HashMap::new(),
            triggered: HashSet::new(),
            running: Vec::new(),
            busy: HashMap::new(),
            reported: HashSet::new(),
            tick: Tick::ZERO,
        }
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ScriptRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of engine ticks run so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn scripts(&self) -> &[EventScript] {
        &self.scripts
    }

    /// Replaces the loaded scripts. Running chains are cancelled first.
    ///
    /// `init` scripts are evaluated on the next tick.
    pub fn load_scripts(&mut self, scripts: Vec<EventScript>, world: &mut World) {
        self.unload(world);
        info!(
            target: "runtime::events",
            scripts = scripts.len(),
            map = world.map_name.as_deref().unwrap_or("<none>"),
            "loaded event scripts"
        );
        self.scripts = scripts;
        self.init_pending = true;
    }

    /// Drops every script and all bookkeeping, cancelling running chains.
    pub fn unload(&mut self, world: &mut World) {
        let ids: Vec<ScriptId> = self.running.iter().map(|r| r.id).collect();
        for id in ids {
            self.cancel(id, world);
        }
        self.scripts.clear();
        self.partial.clear();
        self.triggered.clear();
        self.busy.clear();
        self.reported.clear();
        self.init_pending = false;
    }

    /// Cancels every chain started while `owner` was hosting the engine.
    ///
    /// Cancelled scripts are re-armed so they evaluate fresh. Returns how many
    /// chains were cancelled.
    pub fn cancel_owned_by(&mut self, owner: StateId, world: &mut World) -> usize {
        let ids: Vec<ScriptId> = self
            .running
            .iter()
            .filter(|r| r.owner == Some(owner))
            .map(|r| r.id)
            .collect();
        for &id in &ids {
            self.cancel(id, world);
        }
        ids.len()
    }

    /// Cancels the running chain of `id`. Returns `false` if it was not running.
    pub fn cancel(&mut self, id: ScriptId, world: &mut World) -> bool {
        let Some(index) = self.running.iter().position(|r| r.id == id) else {
            return false;
        };
        let mut running = self.running.remove(index);
        let script = &self.scripts[running.script];
        let mut ctx = ActionContext {
            world,
            config: &self.config,
            script,
            tick: self.tick,
        };
        release(&mut running, &mut self.busy, &mut ctx);
        self.triggered.remove(&id);
        info!(
            target: "runtime::events",
            script = %id,
            name = %script.name,
            "cancelled running script"
        );
        true
    }

    pub fn is_running(&self, id: ScriptId) -> bool {
        self.running.iter().any(|r| r.id == id)
    }

    pub fn running_scripts(&self) -> impl Iterator<Item = ScriptId> + '_ {
        self.running.iter().map(|r| r.id)
    }

    /// True while `id` is satisfied since its last firing and may not re-fire.
    pub fn is_triggered(&self, id: ScriptId) -> bool {
        self.triggered.contains(&id)
    }

    /// Script currently holding `actor` with a blocking action.
    pub fn busy_actor(&self, actor: &str) -> Option<ScriptId> {
        self.busy.get(actor).copied()
    }

    /// Last clause results of `id`, by clause index. Clauses never evaluated are `None`.
    pub fn partial_matches(&self, id: ScriptId) -> Vec<Option<PartialMatch>> {
        let Some(script) = self.scripts.iter().find(|s| s.id == id) else {
            return Vec::new();
        };
        (0..script.conditions.len())
            .map(|clause| self.partial.get(&script.condition_key(clause)).copied())
            .collect()
    }

    /// Tests a single condition clause outside any script.
    ///
    /// The clause is evaluated against the whole loaded map, with no previous
    /// result and without touching the partial-match table. The operator is
    /// applied.
    pub fn check_condition(
        &self,
        clause: &ConditionClause,
        world: &World,
        persist: &mut EventPersist,
    ) -> Result<bool, ScriptError> {
        let condition = self
            .registry
            .condition(&clause.kind)
            .ok_or_else(|| ScriptError::UnknownCondition(clause.kind.clone()))?;
        let script = direct_script(world);
        let mut ctx = ConditionContext {
            world,
            persist,
            script: &script,
            key: script.condition_key(0),
            previous: None,
            tick: self.tick,
        };
        let result = clause.operator.apply(condition.test(&mut ctx, clause)?);
        debug!(
            target: "runtime::events",
            condition = %clause.kind,
            result,
            "checked condition"
        );
        Ok(result)
    }

    /// Starts a single action clause outside any script.
    ///
    /// A blocking action is handed back to the caller, which polls it and
    /// calls its cleanup. Its actor is not reserved in the busy table.
    pub fn execute_action(
        &self,
        clause: &ActionClause,
        world: &mut World,
    ) -> Result<ActionStart, ScriptError> {
        let action = self
            .registry
            .action(&clause.kind)
            .ok_or_else(|| ScriptError::UnknownAction(clause.kind.clone()))?;
        let script = direct_script(world);
        let mut ctx = ActionContext {
            world,
            config: &self.config,
            script: &script,
            tick: self.tick,
        };
        let start = action.start(&mut ctx, clause);
        match &start {
            Ok(start) => debug!(
                target: "runtime::events",
                action = %clause.kind,
                blocking = start.is_blocking(),
                "executed action"
            ),
            Err(err) => warn!(
                target: "runtime::events",
                action = %clause.kind,
                error = %err,
                code = err.error_code(),
                "action failed"
            ),
        }
        start
    }

    /// Runs one engine tick.
    ///
    /// Evaluates every eligible script that is not already running. A script
    /// that fires starts its chain on the spot, so its effects are visible to
    /// the scripts evaluated after it. Chains that were already running are
    /// advanced afterwards. `owner` is recorded on chains started this tick.
    pub fn update(
        &mut self,
        world: &mut World,
        persist: &mut EventPersist,
        owner: Option<StateId>,
    ) -> EngineReport {
        self.tick = self.tick + 1;
        let tick = self.tick;
        let mut report = EngineReport::default();

        let run_init = std::mem::take(&mut self.init_pending);
        let interact = world.input.pressed(self.config.interact_button);

        for index in 0..self.scripts.len() {
            let script = &self.scripts[index];
            let eligible = match script.kind {
                ScriptKind::Event => true,
                ScriptKind::Init => run_init,
                ScriptKind::Interact => interact,
            };
            if !eligible || self.running.iter().any(|r| r.id == script.id) {
                continue;
            }

            if let Some(err) = unknown_action(&self.registry, script) {
                if self.reported.insert(script.id) {
                    log_failure(&script.location(), &err, "skipping script");
                }
                report.failures.push(ScriptFailure {
                    location: script.location(),
                    error: err,
                });
                continue;
            }

            let evaluation = evaluate(
                &self.registry,
                &mut self.partial,
                script,
                world,
                persist,
                tick,
                &mut report,
            );
            let evaluation = match evaluation {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    if self.reported.insert(script.id) {
                        log_failure(&script.location(), &err, "skipping script");
                    }
                    report.failures.push(ScriptFailure {
                        location: script.location(),
                        error: err,
                    });
                    continue;
                }
            };

            let id = script.id;
            if !evaluation.satisfied {
                self.triggered.remove(&id);
                continue;
            }
            let already = !self.triggered.insert(id);
            if already && !evaluation.level {
                continue;
            }

            debug!(
                target: "runtime::events",
                script = %id,
                name = %script.name,
                x = script.region.x,
                y = script.region.y,
                "script fired"
            );
            report.fired.push(id);
            self.running.push(RunningScript {
                script: index,
                id,
                action_index: 0,
                current: None,
                blocked_since: tick,
                actor: None,
                owner,
            });
            self.step_chain(self.running.len() - 1, world, tick, &mut report);
        }

        let mut index = 0;
        while index < self.running.len() {
            if !self.step_chain(index, world, tick, &mut report) {
                index += 1;
            }
        }

        report
    }

    /// Advances the chain at `index` and settles its outcome.
    ///
    /// Returns `true` if the chain ended and was removed.
    fn step_chain(
        &mut self,
        index: usize,
        world: &mut World,
        tick: Tick,
        report: &mut EngineReport,
    ) -> bool {
        let running = &mut self.running[index];
        let script = &self.scripts[running.script];
        let step = advance(
            running,
            script,
            &self.registry,
            &self.config,
            &mut self.busy,
            world,
            tick,
        );
        match step {
            ChainStep::Pending => false,
            ChainStep::Finished => {
                let running = self.running.remove(index);
                debug!(target: "runtime::events", script = %running.id, "script finished");
                report.finished.push(running.id);
                true
            }
            ChainStep::Failed(err) => {
                let running = self.running.remove(index);
                let location = self.scripts[running.script].location();
                if err.severity() == ErrorSeverity::Recoverable {
                    self.triggered.remove(&running.id);
                    warn!(
                        target: "runtime::events",
                        script = %location.script,
                        name = %location.name,
                        x = location.position.x,
                        y = location.position.y,
                        error = %err,
                        code = err.error_code(),
                        "action failed, script re-armed"
                    );
                } else {
                    log_failure(&location, &err, "action chain aborted");
                }
                report.failures.push(ScriptFailure {
                    location,
                    error: err,
                });
                true
            }
        }
    }
}

impl std::fmt::Debug for EventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEngine")
            .field("scripts", &self.scripts.len())
            .field("running", &self.running_scripts().collect::<Vec<_>>())
            .field("triggered", &self.triggered)
            .field("busy", &self.busy)
            .field("tick", &self.tick)
            .finish()
    }
}

/// Tests every condition clause of `script`.
///
/// All clauses are evaluated so the partial-match table stays complete. A
/// clause whose test fails is logged, reported and counted as unsatisfied. An
/// unknown condition identifier aborts the evaluation.
fn evaluate(
    registry: &ScriptRegistry,
    partial: &mut HashMap<ConditionKey, PartialMatch>,
    script: &EventScript,
    world: &World,
    persist: &mut EventPersist,
    tick: Tick,
    report: &mut EngineReport,
) -> Result<Evaluation, ScriptError> {
    let mut evaluation = Evaluation {
        satisfied: true,
        level: script.kind != ScriptKind::Event,
    };

    for (index, clause) in script.conditions.iter().enumerate() {
        let condition = registry
            .condition(&clause.kind)
            .ok_or_else(|| ScriptError::UnknownCondition(clause.kind.clone()))?;
        if condition.trigger() == TriggerMode::Level {
            evaluation.level = true;
        }

        let key = script.condition_key(index);
        let previous = partial.get(&key).map(|m| m.raw);
        let mut ctx = ConditionContext {
            world,
            persist: &mut *persist,
            script,
            key,
            previous,
            tick,
        };
        let (raw, result) = match condition.test(&mut ctx, clause) {
            Ok(raw) => (raw, clause.operator.apply(raw)),
            Err(err) => {
                let location = script.location();
                log_failure(&location, &err, "condition test failed");
                report.failures.push(ScriptFailure {
                    location,
                    error: err,
                });
                (false, false)
            }
        };

        partial.insert(
            key,
            PartialMatch {
                raw,
                result,
                previous_raw: previous,
            },
        );
        evaluation.satisfied &= result;
    }

    Ok(evaluation)
}

/// First action identifier of `script` the registry does not know.
fn unknown_action(registry: &ScriptRegistry, script: &EventScript) -> Option<ScriptError> {
    script
        .actions
        .iter()
        .find(|clause| registry.action(&clause.kind).is_none())
        .map(|clause| ScriptError::UnknownAction(clause.kind.clone()))
}

/// Stand-in script for clauses run outside any script, covering the whole map.
fn direct_script(world: &World) -> EventScript {
    let size = world.map_size;
    EventScript::new(
        DIRECT_SCRIPT,
        "direct",
        Region::new(0, 0, size.width, size.height),
    )
}

/// Advances one chain as far as it can go this tick.
///
/// A blocking action is not polled on the tick it started; non-blocking
/// actions run back to back until the chain blocks, waits or ends.
fn advance(
    running: &mut RunningScript,
    script: &EventScript,
    registry: &ScriptRegistry,
    config: &EngineConfig,
    busy: &mut HashMap<String, ScriptId>,
    world: &mut World,
    tick: Tick,
) -> ChainStep {
    let mut ctx = ActionContext {
        world,
        config,
        script,
        tick,
    };

    loop {
        if let Some(current) = running.current.as_mut() {
            if running.blocked_since == tick {
                return ChainStep::Pending;
            }
            match current.poll(&mut ctx) {
                Ok(status) if status.is_finished() => {
                    release(running, busy, &mut ctx);
                    running.action_index += 1;
                }
                Ok(_) => {
                    let elapsed = tick.since(running.blocked_since);
                    return match config.action_timeout_ticks {
                        Some(limit) if elapsed >= u64::from(limit) => {
                            let action = script.actions[running.action_index].kind.clone();
                            release(running, busy, &mut ctx);
                            ChainStep::Failed(ScriptError::ActionTimedOut {
                                action,
                                ticks: limit,
                            })
                        }
                        _ => ChainStep::Pending,
                    };
                }
                Err(err) => {
                    release(running, busy, &mut ctx);
                    return ChainStep::Failed(err);
                }
            }
        }

        let Some(clause) = script.actions.get(running.action_index) else {
            return ChainStep::Finished;
        };
        let Some(action) = registry.action(&clause.kind) else {
            return ChainStep::Failed(ScriptError::UnknownAction(clause.kind.clone()));
        };

        let actor = action.actor(clause);
        if let Some(actor) = &actor {
            if let Some(holder) = busy.get(actor) {
                if *holder != running.id {
                    debug!(
                        target: "runtime::events",
                        script = %running.id,
                        actor = %actor,
                        holder = %holder,
                        "actor busy, waiting"
                    );
                    return ChainStep::Pending;
                }
            }
        }

        match action.start(&mut ctx, clause) {
            Ok(ActionStart::Complete) => running.action_index += 1,
            Ok(ActionStart::Blocking(blocking)) => {
                if let Some(actor) = &actor {
                    busy.insert(actor.clone(), running.id);
                }
                running.current = Some(blocking);
                running.actor = actor;
                running.blocked_since = tick;
                return ChainStep::Pending;
            }
            Err(err) => return ChainStep::Failed(err),
        }
    }
}

/// Cleans up the chain's blocking action, if any, and frees its actor.
fn release(
    running: &mut RunningScript,
    busy: &mut HashMap<String, ScriptId>,
    ctx: &mut ActionContext<'_>,
) {
    if let Some(mut current) = running.current.take() {
        current.cleanup(ctx);
    }
    if let Some(actor) = running.actor.take() {
        busy.remove(&actor);
    }
}

fn log_failure(location: &ScriptLocation, err: &ScriptError, message: &str) {
    error!(
        target: "runtime::events",
        script = %location.script,
        name = %location.name,
        x = location.position.x,
        y = location.position.y,
        error = %err,
        code = err.error_code(),
        "{}", message
    );
}
