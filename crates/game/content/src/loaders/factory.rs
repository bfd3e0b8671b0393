//! Content factory loading everything a session needs from a data directory.

use std::path::{Path, PathBuf};

use game_core::{EngineConfig, MapDefinition};
use tracing::info;

use crate::loaders::{ConfigLoader, LoadResult, MapLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── maps/
///     ├── town.ron
///     └── house.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`, or the defaults if the
    /// file is absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    /// Load a single map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapDefinition> {
        let path = self.maps_dir().join(format!("{map_name}.ron"));
        MapLoader::load(&path)
    }

    /// Load every map under `maps/`.
    pub fn load_maps(&self) -> LoadResult<Vec<MapDefinition>> {
        let maps = MapLoader::load_dir(&self.maps_dir())?;
        info!(
            target: "game_content::loaders",
            dir = %self.data_dir.display(),
            maps = maps.len(),
            scripts = maps.iter().map(|m| m.scripts.len()).sum::<usize>(),
            "content loaded"
        );
        Ok(maps)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn maps_dir(&self) -> PathBuf {
        self.data_dir.join("maps")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_config_and_maps() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(dir.path().join("config.toml"), "event_host = \"world\"\n").unwrap();
        std::fs::write(dir.path().join("maps/town.ron"), "(size: (12, 12))").unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().event_host.as_deref(), Some("world"));
        assert_eq!(factory.load_map("town").unwrap().name, "town");
        assert_eq!(factory.load_maps().unwrap().len(), 1);
        assert!(factory.load_map("house").is_err());
    }
}
