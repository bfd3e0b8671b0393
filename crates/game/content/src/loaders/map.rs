//! Map data loader.
//!
//! A map file holds the map size, its NPC spawns and its event scripts.
//! Clauses are written in their text form:
//!
//! ```ron
//! (
//!     size: (12, 12),
//!     npcs: [(slug: "maple", position: (5, 6))],
//!     events: [
//!         (
//!             name: "greet",
//!             kind: Interact,
//!             region: (5, 6, 1, 1),
//!             conditions: ["is player_facing_tile"],
//!             actions: ["dialog Hi there!", "set_variable greeted:yes"],
//!         ),
//!     ],
//! )
//! ```
//!
//! Script ids follow the order of `events`, which is also the order the
//! engine evaluates them in.

use std::path::Path;

use anyhow::{Context, bail};
use game_core::{
    ActionClause, BoundaryChecker, ConditionClause, EventScript, MapDefinition, NpcSpawn,
    Position, Region, ScriptId, ScriptKind,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct MapRon {
    /// Defaults to the file stem.
    #[serde(default)]
    name: Option<String>,
    size: (i32, i32),
    #[serde(default)]
    npcs: Vec<NpcRon>,
    #[serde(default)]
    events: Vec<EventRon>,
}

#[derive(Debug, Deserialize)]
struct NpcRon {
    slug: String,
    position: (i32, i32),
}

#[derive(Debug, Deserialize)]
struct EventRon {
    name: String,
    #[serde(default)]
    kind: ScriptKind,
    /// `(x, y, width, height)`
    region: (i32, i32, i32, i32),
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    actions: Vec<String>,
}

/// Loader for map definitions from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a map from a RON file. The map is named after the file stem
    /// unless the file sets `name`.
    pub fn load(path: &Path) -> LoadResult<MapDefinition> {
        let content = read_file(path)?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::parse(&content, stem).with_context(|| format!("invalid map {}", path.display()))
    }

    /// Load every `*.ron` file in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<MapDefinition>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read map directory {}", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut maps: Vec<MapDefinition> = Vec::with_capacity(paths.len());
        for path in paths {
            let map = Self::load(&path)?;
            if maps.iter().any(|m| m.name == map.name) {
                bail!("duplicate map name `{}` in {}", map.name, path.display());
            }
            maps.push(map);
        }
        Ok(maps)
    }

    /// Parse map RON text. `default_name` is used when the map sets no name.
    pub fn parse(content: &str, default_name: &str) -> LoadResult<MapDefinition> {
        let data: MapRon = ron::from_str(content).context("failed to parse map RON")?;

        let name = data.name.unwrap_or_else(|| default_name.to_string());
        if name.is_empty() {
            bail!("map has no name");
        }
        let (width, height) = data.size;
        if width <= 0 || height <= 0 {
            bail!("map `{name}` has invalid size {width}x{height}");
        }

        let mut map = MapDefinition::new(name, data.size);
        let mut bounds = BoundaryChecker::new();
        bounds.update_boundaries(map.size);

        for npc in data.npcs {
            let position = Position::new(npc.position.0, npc.position.1);
            if !bounds.is_within_boundaries(position) {
                warn!(
                    target: "game_content::loaders",
                    map = %map.name,
                    npc = %npc.slug,
                    %position,
                    "npc spawns outside the walkable area"
                );
            }
            map = map.with_npc(NpcSpawn::new(npc.slug, position));
        }

        for (index, event) in data.events.into_iter().enumerate() {
            let script = build_script(index, event)
                .with_context(|| format!("map `{}` event #{index}", map.name))?;
            map = map.with_script(script);
        }

        debug!(
            target: "game_content::loaders",
            map = %map.name,
            width,
            height,
            npcs = map.npcs.len(),
            scripts = map.scripts.len(),
            "map parsed"
        );
        Ok(map)
    }
}

fn build_script(index: usize, event: EventRon) -> LoadResult<EventScript> {
    let id = ScriptId(u32::try_from(index).context("too many events")?);
    let (x, y, width, height) = event.region;
    if width <= 0 || height <= 0 {
        bail!("event `{}` has an empty region", event.name);
    }

    let mut script =
        EventScript::new(id, event.name, Region::new(x, y, width, height)).with_kind(event.kind);
    for (clause, line) in event.conditions.iter().enumerate() {
        let condition: ConditionClause = line
            .parse()
            .with_context(|| format!("event `{}` condition #{clause}", script.name))?;
        script = script.with_condition(condition);
    }
    for (clause, line) in event.actions.iter().enumerate() {
        let action: ActionClause = line
            .parse()
            .with_context(|| format!("event `{}` action #{clause}", script.name))?;
        script = script.with_action(action);
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Operator;
    use tempfile::TempDir;

    const TOWN: &str = r#"
(
    size: (12, 12),
    npcs: [(slug: "maple", position: (5, 6))],
    events: [
        (
            name: "greet",
            kind: Interact,
            region: (5, 6, 1, 1),
            conditions: ["is player_facing_tile"],
            actions: ["dialog Hi there!", "set_variable greeted:yes"],
        ),
        (
            name: "door",
            region: (3, 3, 1, 1),
            conditions: ["is player_moved", "is_not variable_set locked"],
            actions: ["transition_teleport house,2,2"],
        ),
    ],
)
"#;

    #[test]
    fn parses_npcs_and_scripts_in_order() {
        let map = MapLoader::parse(TOWN, "town").unwrap();

        assert_eq!(map.name, "town");
        assert_eq!((map.size.width, map.size.height), (12, 12));
        assert_eq!(map.npcs, vec![NpcSpawn::new("maple", Position::new(5, 6))]);

        let ids: Vec<_> = map.scripts.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![ScriptId(0), ScriptId(1)]);

        let greet = &map.scripts[0];
        assert_eq!(greet.kind, ScriptKind::Interact);
        assert_eq!(greet.region, Region::tile(5, 6));
        assert_eq!(greet.actions[0].kind, "dialog");
        assert_eq!(greet.actions[0].parameters, vec!["Hi there!"]);

        let door = &map.scripts[1];
        assert_eq!(door.kind, ScriptKind::Event);
        assert_eq!(door.conditions[1].operator, Operator::IsNot);
        assert_eq!(door.conditions[1].kind, "variable_set");
    }

    #[test]
    fn explicit_name_wins_over_the_file_stem() {
        let map = MapLoader::parse("(name: \"cellar\", size: (4, 4))", "b1").unwrap();
        assert_eq!(map.name, "cellar");
        assert!(map.scripts.is_empty());
    }

    #[test]
    fn rejects_bad_content() {
        assert!(MapLoader::parse("(size: (0, 4))", "empty").is_err());
        assert!(MapLoader::parse("(size: (4, 4)", "broken").is_err());

        let bad_operator = r#"(size: (4, 4), events: [(name: "x", region: (1, 1, 1, 1), conditions: ["maybe player_at"])])"#;
        let err = MapLoader::parse(bad_operator, "m").unwrap_err();
        assert!(format!("{err:#}").contains("condition #0"));
    }

    #[test]
    fn load_dir_reads_every_ron_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("town.ron"), TOWN).unwrap();
        std::fs::write(dir.path().join("house.ron"), "(size: (8, 8))").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a map").unwrap();

        let maps = MapLoader::load_dir(dir.path()).unwrap();
        let names: Vec<_> = maps.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["house", "town"]);
    }

    #[test]
    fn load_dir_rejects_duplicate_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ron"), "(name: \"town\", size: (8, 8))").unwrap();
        std::fs::write(dir.path().join("b.ron"), "(name: \"town\", size: (8, 8))").unwrap();
        assert!(MapLoader::load_dir(dir.path()).is_err());
    }
}
