//! User configuration and resolved sync locations

use crate::error::{Result, SaverError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where Windows keeps the lock-screen (Spotlight) image cache, relative to
/// the local application data directory
pub const SPOTLIGHT_ASSETS_DIR: &str =
    "Packages/Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy/LocalState/Assets";

/// Folder created under the user's pictures directory for saved wallpapers
pub const DESTINATION_FOLDER_NAME: &str = "Spotlight_Images";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    /// Overrides the lock-screen cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    /// Overrides the folder wallpapers are saved into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_dir: Option<PathBuf>,
}

impl UserConfig {
    /// Get the config file path (~/.config/spotlight-saver/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spotlight-saver").join("config.json"))
    }

    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            SaverError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SaverError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| SaverError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            SaverError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SaverError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SaverError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            SaverError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}

/// The two directories a sync run works on.
///
/// Resolved once at startup and passed to the synchronizer explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    pub destination: PathBuf,
    pub source: PathBuf,
}

impl SyncPaths {
    pub fn new(destination: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
        }
    }

    /// Resolves each directory from, in order: the explicit override, the
    /// user config, the platform default.
    pub fn resolve(
        destination: Option<PathBuf>,
        source: Option<PathBuf>,
        user_config: &UserConfig,
    ) -> Result<Self> {
        let destination = match destination.or_else(|| user_config.destination_dir.clone()) {
            Some(dir) => dir,
            None => default_destination_dir().ok_or_else(|| {
                SaverError::ConfigError("Could not determine pictures directory".to_string())
            })?,
        };

        let source = match source.or_else(|| user_config.source_dir.clone()) {
            Some(dir) => dir,
            None => default_source_dir().ok_or_else(|| {
                SaverError::ConfigError(
                    "Could not determine local application data directory".to_string(),
                )
            })?,
        };

        Ok(Self {
            destination,
            source,
        })
    }
}

pub fn default_source_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(SPOTLIGHT_ASSETS_DIR))
}

pub fn default_destination_dir() -> Option<PathBuf> {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(DESTINATION_FOLDER_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(config.source_dir.is_none());
        assert!(config.destination_dir.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = UserConfig {
            source_dir: Some(PathBuf::from("/cache/Assets")),
            destination_dir: None,
        };
        config.save_to(&path).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!fs::read_to_string(&path).unwrap().contains("destination_dir"));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = UserConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(loaded, UserConfig::default());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = UserConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SaverError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_prefers_explicit_paths() {
        let config = UserConfig {
            source_dir: Some(PathBuf::from("/config/source")),
            destination_dir: Some(PathBuf::from("/config/dest")),
        };

        let paths = SyncPaths::resolve(
            Some(PathBuf::from("/cli/dest")),
            Some(PathBuf::from("/cli/source")),
            &config,
        )
        .unwrap();
        assert_eq!(paths, SyncPaths::new("/cli/dest", "/cli/source"));
    }

    #[test]
    fn test_resolve_falls_back_to_config() {
        let config = UserConfig {
            source_dir: Some(PathBuf::from("/config/source")),
            destination_dir: Some(PathBuf::from("/config/dest")),
        };

        let paths = SyncPaths::resolve(Some(PathBuf::from("/cli/dest")), None, &config).unwrap();
        assert_eq!(paths.destination, PathBuf::from("/cli/dest"));
        assert_eq!(paths.source, PathBuf::from("/config/source"));
    }

    #[test]
    fn test_default_dirs_layout() {
        if let Some(source) = default_source_dir() {
            assert!(source.ends_with("LocalState/Assets"));
        }
        if let Some(destination) = default_destination_dir() {
            assert!(destination.ends_with(DESTINATION_FOLDER_NAME));
        }
    }
}
