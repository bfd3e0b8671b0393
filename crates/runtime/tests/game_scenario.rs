use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use game_core::{
    Button, Direction, EngineConfig, EventScript, InputEvent, MapDefinition, NpcSpawn, Position,
    Region, ScriptId, ScriptKind, StateArgs, StateRequest,
};
use runtime::{Game, StackError, State, StateFlags, TeleportError, TickContext};

const FRAME: Duration = Duration::from_millis(16);

type Journal = Rc<RefCell<Vec<String>>>;

/// Overworld screen hosting the event engine.
struct Overworld;

impl State for Overworld {}

/// Dialog box: shows its text and closes on the A button.
struct DialogBox {
    journal: Journal,
}

impl State for DialogBox {
    fn flags(&self) -> StateFlags {
        StateFlags::BLOCKING | StateFlags::TRANSPARENT
    }

    fn startup(&mut self, args: &StateArgs) {
        let text = args.get("text").unwrap_or_default();
        self.journal.borrow_mut().push(format!("dialog: {text}"));
    }

    fn get_event(&mut self, ctx: &mut TickContext<'_>, event: InputEvent) -> Option<InputEvent> {
        if event.pressed && event.button == Button::A {
            ctx.world.request_state(StateRequest::Pop);
            return None;
        }
        Some(event)
    }
}

/// Screen fade that ends itself after two updates.
#[derive(Default)]
struct Fade {
    frames: u32,
}

impl State for Fade {
    fn flags(&self) -> StateFlags {
        StateFlags::BLOCKING | StateFlags::FORCE_DRAW | StateFlags::TRANSITION
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.frames += 1;
        if self.frames == 2 {
            ctx.world
                .request_state(StateRequest::PopNamed(EngineConfig::DEFAULT_TRANSITION_STATE.into()));
        }
    }
}

fn script(id: u32, name: &str, region: Region, conditions: &[&str], actions: &[&str]) -> EventScript {
    let mut script = EventScript::new(ScriptId(id), name, region);
    for condition in conditions {
        script = script.with_condition(condition.parse().expect("valid condition clause"));
    }
    for action in actions {
        script = script.with_action(action.parse().expect("valid action clause"));
    }
    script
}

fn town() -> MapDefinition {
    MapDefinition::new("town", (12, 12))
        .with_npc(NpcSpawn::new("maple", Position::new(5, 6)))
        .with_script(
            script(
                0,
                "talk_to_maple",
                Region::tile(5, 6),
                &["is player_facing_tile"],
                &["dialog Hello", "set_variable talked:yes"],
            )
            .with_kind(ScriptKind::Interact),
        )
        .with_script(script(
            1,
            "house_door",
            Region::tile(3, 3),
            &["is player_moved"],
            &["transition_teleport house,2,2"],
        ))
}

fn house() -> MapDefinition {
    MapDefinition::new("house", (8, 8)).with_script(
        script(0, "welcome", Region::new(0, 0, 8, 8), &[], &["set_variable entered_house:yes"])
            .with_kind(ScriptKind::Init),
    )
}

fn setup(maps: Vec<MapDefinition>, start: &str) -> (Game, Journal) {
    let journal: Journal = Rc::default();
    let mut game = Game::builder()
        .config(EngineConfig::default().with_event_host("world"))
        .maps(maps)
        .build();

    game.register_state("world", || Overworld).expect("register world");
    let dialog_journal = Rc::clone(&journal);
    game.register_state("dialog", move || DialogBox {
        journal: Rc::clone(&dialog_journal),
    })
    .expect("register dialog");
    game.register_state("transition", Fade::default)
        .expect("register transition");

    game.load_map(start).expect("start map exists");
    game.push_state("world", StateArgs::new()).expect("push world");
    (game, journal)
}

/// Talking to an NPC opens a dialog that blocks the script until it is closed.
#[test]
fn dialog_blocks_the_script_until_closed() {
    let (mut game, journal) = setup(vec![town(), house()], "town");
    game.world_mut().player.warp(Position::new(5, 5));
    game.world_mut().player.facing = Direction::Down;

    let report = game.tick(FRAME, &[InputEvent::press(Button::A)]);
    assert_eq!(report.events.expect("engine ran").fired, vec![ScriptId(0)]);
    assert_eq!(game.states().current_state_name(), Some("dialog"));
    assert_eq!(*journal.borrow(), vec!["dialog: Hello"]);

    game.tick(FRAME, &[]);
    assert_eq!(game.world().variables.get("talked"), None);

    game.tick(FRAME, &[InputEvent::press(Button::A)]);
    assert_eq!(game.states().current_state_name(), Some("world"));
    assert_eq!(game.world().variables.get("talked"), None);

    let report = game.tick(FRAME, &[]);
    assert_eq!(report.events.expect("engine ran").finished, vec![ScriptId(0)]);
    assert_eq!(game.world().variables.get("talked"), Some("yes"));
}

/// Stepping on a door plays the transition, then loads the other map.
#[test]
fn transition_teleport_waits_for_the_transition() {
    let (mut game, _journal) = setup(vec![town(), house()], "town");
    game.world_mut().player.warp(Position::new(3, 4));

    game.tick(FRAME, &[]);
    game.world_mut().player.walk(Direction::Up, 1);
    game.tick(FRAME, &[]);
    let report = game.tick(FRAME, &[]);

    assert_eq!(report.events.expect("engine ran").fired, vec![ScriptId(1)]);
    assert_eq!(game.states().current_state_name(), Some("transition"));
    assert_eq!(game.world().map_name.as_deref(), Some("town"));
    assert!(game.world().delayed_teleport.is_some());

    game.tick(FRAME, &[]);
    assert_eq!(game.world().map_name.as_deref(), Some("town"));

    game.tick(FRAME, &[]);
    assert_eq!(game.states().current_state_name(), Some("world"));
    assert_eq!(game.world().map_name.as_deref(), Some("house"));
    assert_eq!(game.world().player.position, Position::new(2, 2));
    assert!(game.world().npcs.is_empty());

    game.tick(FRAME, &[]);
    assert_eq!(game.world().variables.get("entered_house"), Some("yes"));
}

/// Scripts only run while their host state is on the stack, and chains
/// started by a host die with it.
#[test]
fn popping_the_host_cancels_its_chains() {
    let field = MapDefinition::new("field", (10, 10)).with_script(script(
        0,
        "slow",
        Region::new(0, 0, 10, 10),
        &["is player_at"],
        &["wait 5", "set_variable waited:yes"],
    ));
    let (mut game, _journal) = setup(vec![field], "field");
    game.world_mut().player.warp(Position::new(4, 4));

    game.tick(FRAME, &[]);
    assert!(game.engine().is_running(ScriptId(0)));

    game.pop_state(None).expect("pop world");
    assert!(game.is_done());
    assert!(!game.engine().is_running(ScriptId(0)));
    assert_eq!(game.tick(FRAME, &[]).events, None);

    game.push_state("world", StateArgs::new()).expect("push world");
    let report = game.tick(FRAME, &[]);
    assert_eq!(report.events.expect("engine ran").fired, vec![ScriptId(0)]);
    assert_eq!(game.world().variables.get("waited"), None);
}

/// Bad transitions and teleports requested by scripts are reported, not raised.
#[test]
fn script_requested_failures_are_reported() {
    let field = MapDefinition::new("field", (10, 10))
        .with_script(script(
            0,
            "shop",
            Region::new(0, 0, 10, 10),
            &["is player_at"],
            &["push_state shop"],
        ))
        .with_script(script(
            1,
            "portal",
            Region::new(0, 0, 10, 10),
            &["is player_at"],
            &["teleport nowhere,1,1"],
        ));
    let (mut game, _journal) = setup(vec![field], "field");
    game.world_mut().player.warp(Position::new(4, 4));

    let report = game.tick(FRAME, &[]);
    assert_eq!(report.stack_errors, vec![StackError::UnknownState("shop".into())]);
    assert_eq!(
        report.teleport_errors,
        vec![TeleportError::UnknownMap("nowhere".into())]
    );
    assert_eq!(game.states().current_state_name(), Some("world"));
    assert_eq!(game.world().map_name.as_deref(), Some("field"));
}

/// A script can close the last state and end the game.
#[test]
fn popping_the_last_state_ends_the_game() {
    let field = MapDefinition::new("field", (10, 10)).with_script(script(
        0,
        "quit",
        Region::new(0, 0, 10, 10),
        &["is variable_set quit"],
        &["pop_state world"],
    ));
    let (mut game, _journal) = setup(vec![field], "field");

    game.tick(FRAME, &[]);
    assert!(!game.is_done());

    game.world_mut().variables.set("quit", "1");
    game.tick(FRAME, &[]);
    assert!(game.is_done());
    assert!(game.world().active_states.is_empty());
}

/// A teleport onto a tile outside the destination map leaves the current
/// map loaded and the player where they were.
#[test]
fn out_of_bounds_teleport_keeps_the_current_map() {
    let field = MapDefinition::new("field", (12, 12))
        .with_npc(NpcSpawn::new("scarecrow", Position::new(2, 2)))
        .with_script(script(
            0,
            "bad_portal",
            Region::tile(8, 8),
            &["is player_at"],
            &["teleport closet,9,9"],
        ));
    let closet = MapDefinition::new("closet", (5, 5));
    let (mut game, _journal) = setup(vec![field, closet], "field");
    game.world_mut().player.warp(Position::new(8, 8));

    let report = game.tick(FRAME, &[]);
    assert_eq!(
        report.teleport_errors,
        vec![TeleportError::OutOfBounds(Position::new(9, 9), "closet".into())]
    );
    assert_eq!(game.world().map_name.as_deref(), Some("field"));
    assert_eq!(game.world().player.position, Position::new(8, 8));
    assert!(game.world().boundaries.is_within_boundaries(Position::new(8, 8)));
    assert!(game.world().npcs.contains("scarecrow"));
}
