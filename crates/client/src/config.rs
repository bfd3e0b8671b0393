//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Input plan used when `OVERWORLD_INPUTS` is not set: greet Maple, walk
/// into the house, collect Grandpa's gift, then quit.
pub const DEFAULT_INPUTS: &str = "2*-,right,-,right,-,a,3*-,a,6*-,\
    left,-,left,-,up,-,up,8*-,a,3*-,up,-,up,-,a,3*-,a,3*-,start";

/// Configuration required to bootstrap a headless session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub content_dir: PathBuf,
    pub start_map: String,
    pub max_ticks: u64,
    /// Scripted input, see [`crate::input::InputPlan`].
    pub inputs: String,
    /// When set, logs are also written to `overworld.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/content")),
            start_map: "town".to_string(),
            max_ticks: 600,
            inputs: DEFAULT_INPUTS.to_string(),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `OVERWORLD_CONTENT_DIR` - Directory holding `config.toml` and `maps/` (default: bundled content)
    /// - `OVERWORLD_START_MAP` - Map loaded at startup (default: town)
    /// - `OVERWORLD_MAX_TICKS` - Tick limit of the session (default: 600)
    /// - `OVERWORLD_INPUTS` - Scripted input plan (default: [`DEFAULT_INPUTS`])
    /// - `OVERWORLD_LOG_DIR` - Directory for a log file (default: stderr only)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("OVERWORLD_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Ok(map) = env::var("OVERWORLD_START_MAP") {
            config.start_map = map;
        }
        if let Some(ticks) = read_env::<u64>("OVERWORLD_MAX_TICKS") {
            config.max_ticks = ticks.max(1);
        }
        if let Ok(inputs) = env::var("OVERWORLD_INPUTS") {
            config.inputs = inputs;
        }
        config.log_dir = env::var("OVERWORLD_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
