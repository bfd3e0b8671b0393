//! Engine configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::EngineConfig;
use tracing::info;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`EngineConfig`] from TOML files.
///
/// Every field is optional; missing keys take their default value.
///
/// ```toml
/// action_timeout_ticks = 600
/// interact_button = "A"
/// event_host = "world"
/// dialog_state = "dialog"
/// transition_state = "transition"
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the engine configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Like [`ConfigLoader::load`], falling back to the defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> LoadResult<EngineConfig> {
        if !path.exists() {
            info!(
                target: "game_content::loaders",
                path = %path.display(),
                "no config file, using defaults"
            );
            return Ok(EngineConfig::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        toml::from_str(content).context("failed to parse config TOML")
    }
}
