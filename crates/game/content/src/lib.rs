//! Data-driven content loaders.
//!
//! Maps and their event scripts live in RON files, the engine configuration
//! in TOML:
//! - Map layouts with NPC spawns and event scripts (`maps/*.ron`)
//! - Engine configuration (`config.toml`)
//!
//! All loaders produce game-core types directly; clause text is parsed with
//! the same grammar the runtime uses.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapLoader};
