//! Built-in condition types.
//!
//! | identifier | parameters | trigger |
//! |---|---|---|
//! | `player_at` | | edge |
//! | `player_moved` | | level (detects its own edges) |
//! | `player_facing_tile` | | edge |
//! | `variable_set` | `key[:value]` | edge |
//! | `variable_is` | `value1,op,value2` | edge |
//! | `has_item` | `item[,min]` | edge |
//! | `npc_exists` | `slug` | edge |
//! | `button_pressed` | `button` | level (true for one tick) |
mod input;
mod items;
mod npc;
mod player;
mod variables;

use std::sync::Arc;

pub use input::ButtonPressed;
pub use items::HasItem;
pub use npc::NpcExists;
pub use player::{PlayerAt, PlayerFacingTile, PlayerMoved};
pub use variables::{Comparison, VariableIs, VariableSet};

use crate::event::Condition;

pub(crate) fn builtin() -> Vec<Arc<dyn Condition>> {
    vec![
        Arc::new(PlayerAt),
        Arc::new(PlayerMoved),
        Arc::new(PlayerFacingTile),
        Arc::new(VariableSet),
        Arc::new(VariableIs),
        Arc::new(HasItem),
        Arc::new(NpcExists),
        Arc::new(ButtonPressed),
    ]
}
