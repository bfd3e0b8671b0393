use overworld_client::{ClientConfig, InputPlan, Session};

fn var<'a>(summary: &'a overworld_client::SessionSummary, key: &str) -> Option<&'a str> {
    summary
        .variables
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// The bundled content played with the default input plan.
#[test]
fn default_plan_plays_through_the_demo() {
    let mut session = Session::load(&ClientConfig::default()).expect("bundled content loads");
    let summary = session.run();

    assert!(summary.finished);
    assert_eq!(summary.ticks, 49);
    assert_eq!(summary.map.as_deref(), Some("house"));
    assert_eq!(var(&summary, "met_maple"), Some("yes"));
    assert_eq!(var(&summary, "visited_house"), Some("yes"));
    assert_eq!(summary.inventory, vec![("potion".to_string(), 3)]);
    assert_eq!(summary.script_failures, 0);
    assert_eq!(summary.stack_errors, 0);
    assert_eq!(summary.teleport_errors, 0);
}

#[test]
fn tick_limit_stops_an_idle_session() {
    let config = ClientConfig {
        inputs: String::new(),
        max_ticks: 20,
        ..ClientConfig::default()
    };
    let summary = Session::load(&config).expect("bundled content loads").run();

    assert!(!summary.finished);
    assert_eq!(summary.ticks, 20);
    assert_eq!(summary.map.as_deref(), Some("town"));
    assert_eq!(summary.player, game_core::Position::new(3, 5));
    assert_eq!(var(&summary, "spawned"), Some("yes"));
}

#[test]
fn unknown_start_map_is_an_error() {
    let config = ClientConfig {
        start_map: "moon".to_string(),
        ..ClientConfig::default()
    };
    assert!(Session::load(&config).is_err());
}

#[test]
fn maple_walks_away_after_the_greeting() {
    let plan = InputPlan::parse("2*-,right,-,right,-,a,3*-,a,5*-").unwrap();
    let config = ClientConfig::default();
    let factory = game_content::ContentFactory::new(&config.content_dir);
    let mut session = Session::new(
        factory.load_config().unwrap(),
        factory.load_maps().unwrap(),
        "town",
        plan,
        100,
    )
    .unwrap();

    for _ in 0..16 {
        session.step();
    }
    let maple = session.game().world().npcs.get("maple").expect("maple stays on the map");
    assert_eq!(maple.position, game_core::Position::new(6, 7));
    assert_eq!(maple.facing, game_core::Direction::Up);
    assert!(!session.game().engine().is_running(game_core::ScriptId(1)));
}
