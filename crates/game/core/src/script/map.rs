use crate::world::{MapSize, Position};

use super::EventScript;

/// NPC placed on the map when it loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSpawn {
    pub slug: String,
    pub position: Position,
}

impl NpcSpawn {
    pub fn new(slug: impl Into<String>, position: Position) -> Self {
        Self {
            slug: slug.into(),
            position,
        }
    }
}

/// Everything the state/event core needs from a parsed map file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDefinition {
    pub name: String,
    pub size: MapSize,
    pub npcs: Vec<NpcSpawn>,
    /// Scripts in load order; evaluation follows this order every tick.
    pub scripts: Vec<EventScript>,
}

impl MapDefinition {
    pub fn new(name: impl Into<String>, size: impl Into<MapSize>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
            npcs: Vec::new(),
            scripts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_npc(mut self, npc: NpcSpawn) -> Self {
        self.npcs.push(npc);
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: EventScript) -> Self {
        self.scripts.push(script);
        self
    }
}
