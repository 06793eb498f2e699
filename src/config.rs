/// Application configuration
///
/// Defaults live beside the executable: the `Images` folder, the
/// `layout.dat` file and an optional `image-drag.json` overriding any field.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::state::data::TileSize;

/// Name of the optional config file beside the executable
pub const CONFIG_FILE: &str = "image-drag.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Folder the source gallery starts from
    pub image_directory: PathBuf,
    /// Where the layout is saved and restored
    pub layout_file: PathBuf,
    /// Edge of the square gallery thumbnails, in pixels
    pub thumbnail_size: u32,
    /// Tile size used in adaptive mode
    pub uniform_tile_size: TileSize,
    /// Length of the adaptive-mode transition
    pub animation_duration_ms: u64,
    /// Period of the animation tick
    pub animation_tick_ms: u64,
    /// Maximum number of decoded images kept in memory
    pub image_cache_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = app_dir();
        Self {
            image_directory: base.join("Images"),
            layout_file: base.join("layout.dat"),
            thumbnail_size: 120,
            uniform_tile_size: TileSize::new(120, 120),
            animation_duration_ms: 100,
            animation_tick_ms: 10,
            image_cache_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load the config from beside the executable.
    ///
    /// A missing file yields the defaults. A malformed file also yields the
    /// defaults, together with the error so the caller can report it.
    pub fn load() -> (Self, Option<Error>) {
        Self::load_from(&app_dir().join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> (Self, Option<Error>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::read(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn animation_tick(&self) -> Duration {
        Duration::from_millis(self.animation_tick_ms.max(1))
    }
}

/// Directory holding the executable, with a per-user data dir as fallback
pub fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| dirs::data_dir().map(|dir| dir.join("image-drag")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warning) = AppConfig::load_from(&dir.path().join(CONFIG_FILE));
        assert!(warning.is_none());
        assert_eq!(config, AppConfig::default());
        assert!(config.layout_file.ends_with("layout.dat"));
        assert!(config.image_directory.ends_with("Images"));
    }

    #[test]
    fn test_partial_file_overrides_some_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "animation_duration_ms": 400, "image_directory": "/pics" }"#)
            .unwrap();

        let (config, warning) = AppConfig::load_from(&path);
        assert!(warning.is_none());
        assert_eq!(config.animation_duration(), Duration::from_millis(400));
        assert_eq!(config.image_directory, PathBuf::from("/pics"));
        assert_eq!(config.thumbnail_size, 120);
    }

    #[test]
    fn test_malformed_file_reports_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let (config, warning) = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
        assert!(matches!(warning, Some(Error::Config { .. })));
    }
}
