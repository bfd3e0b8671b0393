//! Headless overworld client.
//!
//! Wires the content loaders, the runtime and a scripted input source into a
//! fixed-step tick loop:
//!
//! ```text
//! .env / environment ─→ ClientConfig
//! content dir ───────→ EngineConfig + maps ─→ Game
//! OVERWORLD_INPUTS ──→ InputPlan ─→ Game::tick (one entry per tick)
//! ```
//!
//! The screens registered by [`states::register_states`] stand in for a real
//! frontend: they route input, log dialog text and time transitions.

pub mod config;
pub mod input;
pub mod logging;
pub mod session;
pub mod states;

pub use config::ClientConfig;
pub use input::InputPlan;
pub use session::{Session, SessionSummary};
