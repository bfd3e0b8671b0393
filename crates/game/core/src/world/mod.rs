//! Mutable world/session context.
//!
//! [`World`] holds the facts event scripts read and actions mutate: the
//! current map, the player, the NPC registry, game variables and this tick's
//! unconsumed input. It is owned by the running session and lent to the event
//! engine, states and condition/action implementations for the duration of a
//! call. Cross-frame condition memory lives next to it in [`EventPersist`].
mod boundary;
mod character;
mod common;
mod input;
mod npc;
mod persist;
mod request;
mod variables;

pub use boundary::BoundaryChecker;
pub use character::{Character, Inventory};
pub use common::{Direction, MapSize, Position, Tick};
pub use input::{Button, InputBuffer, InputEvent};
pub use npc::NpcRegistry;
pub use persist::{EventPersist, PersistValue};
pub use request::{StateArgs, StateRequest, Teleport};
pub use variables::Variables;

use crate::error::ScriptError;
use crate::script::MapDefinition;

/// Slug scripts use to address the player character.
pub const PLAYER_SLUG: &str = "player";

#[derive(Clone, Debug)]
pub struct World {
    /// Name of the loaded map, `None` before the first load.
    pub map_name: Option<String>,
    pub map_size: MapSize,
    pub boundaries: BoundaryChecker,
    pub player: Character,
    pub npcs: NpcRegistry,
    pub scroll_offset: Position,
    pub variables: Variables,
    /// Input events no state consumed this tick.
    pub input: InputBuffer,
    /// Names of the active states, top first, as of the end of the last tick.
    pub active_states: Vec<String>,
    /// State transitions requested during this tick.
    pub state_requests: Vec<StateRequest>,
    /// Teleport applied at the end of the tick.
    pub pending_teleport: Option<Teleport>,
    /// Teleport applied once no transition state is active.
    pub delayed_teleport: Option<Teleport>,
}

impl World {
    pub fn new() -> Self {
        Self {
            map_name: None,
            map_size: MapSize::default(),
            boundaries: BoundaryChecker::new(),
            player: Character::new(PLAYER_SLUG, Position::ORIGIN),
            npcs: NpcRegistry::new(),
            scroll_offset: Position::ORIGIN,
            variables: Variables::new(),
            input: InputBuffer::default(),
            active_states: Vec::new(),
            state_requests: Vec::new(),
            pending_teleport: None,
            delayed_teleport: None,
        }
    }

    /// Switches the world to `map`: boundaries, NPCs and transient input are reset.
    ///
    /// The player, inventory and variables carry over.
    pub fn load_map(&mut self, map: &MapDefinition) {
        self.map_name = Some(map.name.clone());
        self.map_size = map.size;
        self.boundaries.update_boundaries(map.size);
        self.player.stop();
        self.npcs.clear();
        for spawn in &map.npcs {
            self.npcs
                .insert(Character::new(spawn.slug.clone(), spawn.position));
        }
        self.input.clear();
    }

    /// Looks up the player (`"player"`) or an NPC by slug.
    pub fn character(&self, slug: &str) -> Option<&Character> {
        if slug == PLAYER_SLUG {
            Some(&self.player)
        } else {
            self.npcs.get(slug)
        }
    }

    pub fn character_mut(&mut self, slug: &str) -> Option<&mut Character> {
        if slug == PLAYER_SLUG {
            Some(&mut self.player)
        } else {
            self.npcs.get_mut(slug)
        }
    }

    /// Like [`World::character_mut`], failing with [`ScriptError::CharacterNotFound`].
    pub fn require_character(&mut self, slug: &str) -> Result<&mut Character, ScriptError> {
        self.character_mut(slug)
            .ok_or_else(|| ScriptError::CharacterNotFound(slug.to_string()))
    }

    /// Steps every character one tick along its path.
    pub fn advance_movement(&mut self) {
        let bounds = self.boundaries;
        self.player.step(&bounds);
        for npc in self.npcs.iter_mut() {
            npc.step(&bounds);
        }
    }

    /// Places the player on `position` of the current map.
    pub fn warp_player(&mut self, position: Position) -> Result<(), ScriptError> {
        if !self.boundaries.is_within_boundaries(position) {
            return Err(ScriptError::OutOfBounds(position));
        }
        self.player.warp(position);
        Ok(())
    }

    pub fn request_state(&mut self, request: StateRequest) {
        self.state_requests.push(request);
    }

    pub fn is_state_active(&self, name: &str) -> bool {
        self.active_states.iter().any(|s| s == name)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NpcSpawn;

    #[test]
    fn load_map_resets_boundaries_and_npcs() {
        let mut world = World::new();
        world.npcs.insert(Character::new("old", Position::new(1, 1)));
        let map = MapDefinition::new("town", (10, 8))
            .with_npc(NpcSpawn::new("maple", Position::new(3, 3)));

        world.load_map(&map);

        assert_eq!(world.map_name.as_deref(), Some("town"));
        assert_eq!(world.boundaries.invalid_x(), (-1, 10));
        assert_eq!(world.boundaries.invalid_y(), (-1, 8));
        assert!(!world.npcs.contains("old"));
        assert!(world.npcs.contains("maple"));
    }

    #[test]
    fn player_slug_resolves_to_player() {
        let mut world = World::new();
        assert_eq!(world.character(PLAYER_SLUG).unwrap().slug, "player");
        assert!(world.character("nobody").is_none());
        assert_eq!(
            world.require_character("nobody").unwrap_err(),
            ScriptError::CharacterNotFound("nobody".into())
        );
    }

    #[test]
    fn warp_rejects_positions_outside_the_map() {
        let mut world = World::new();
        world.load_map(&MapDefinition::new("town", (10, 10)));
        assert!(world.warp_player(Position::new(4, 4)).is_ok());
        assert_eq!(world.player.position, Position::new(4, 4));
        assert_eq!(
            world.warp_player(Position::new(10, 4)),
            Err(ScriptError::OutOfBounds(Position::new(10, 4)))
        );
    }
}
