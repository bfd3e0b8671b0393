//! Data model for the game state stack and map-event scripting core.
//!
//! `game-core` defines the world/session context scripts run against, the
//! immutable event-script records, the boundary checker and the shared error
//! taxonomy. It has no behavior of its own beyond plain data manipulation;
//! the `runtime` crate interprets these types tick by tick.
pub mod config;
pub mod error;
pub mod script;
pub mod world;

pub use config::EngineConfig;
pub use error::{ErrorSeverity, GameError, ScriptError};
pub use script::{
    ActionClause, ConditionClause, ConditionKey, EventScript, MapDefinition, NpcSpawn, Operator,
    Region, ScriptId, ScriptKind, ScriptLocation,
};
pub use world::{
    BoundaryChecker, Button, Character, Direction, EventPersist, InputBuffer, InputEvent,
    Inventory, MapSize, NpcRegistry, PLAYER_SLUG, PersistValue, Position, StateArgs,
    StateRequest, Teleport, Tick, Variables, World,
};
