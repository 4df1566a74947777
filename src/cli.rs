// CLI module for argument parsing and configuration

use crate::config::{SyncPaths, UserConfig};
use crate::error::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Spotlight Saver - keep the Windows lock-screen wallpapers
///
/// Scans the lock-screen image cache, picks out the full-size landscape
/// photos and copies each one once into your pictures folder.
#[derive(Parser, Debug, Clone)]
#[command(name = "spotlight-saver")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Lock-screen cache directory to scan
    ///
    /// Defaults to the Windows Spotlight asset cache of the current user.
    #[arg(long = "source", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Folder to save wallpapers into
    ///
    /// Defaults to "Spotlight_Images" in your pictures folder.
    #[arg(long = "dest", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// List the saved wallpapers after syncing
    #[arg(short = 'l', long = "list", action = ArgAction::SetTrue)]
    pub list: bool,

    /// Open the wallpaper folder in the file browser after syncing
    #[arg(short = 'o', long = "open", action = ArgAction::SetTrue)]
    pub open: bool,

    /// Remember --source and --dest as the new defaults
    #[arg(long = "save-config", action = ArgAction::SetTrue)]
    pub save_config: bool,

    /// Log every candidate that is examined
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref dest) = self.destination {
            if dest.exists() && !dest.is_dir() {
                return Err(format!("Path is not a directory: {}", dest.display()));
            }
        }

        if let Some(ref source) = self.source {
            if source.exists() && !source.is_dir() {
                return Err(format!("Path is not a directory: {}", source.display()));
            }
        }

        if self.save_config && self.source.is_none() && self.destination.is_none() {
            return Err("--save-config needs --source or --dest".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub list: bool,
    pub open: bool,
    pub save_config: bool,
    pub verbose: bool,
}

impl AppConfig {
    /// Picks the stored config to work from. An unreadable config file is
    /// tolerated for a plain sync, but not when `--save-config` would
    /// overwrite it.
    pub fn user_config_or_default(&self, loaded: Result<UserConfig>) -> Result<UserConfig> {
        match loaded {
            Ok(user_config) => Ok(user_config),
            Err(e) if self.save_config => Err(e),
            Err(e) => {
                tracing::warn!("Failed to load user config: {e}");
                Ok(UserConfig::default())
            }
        }
    }

    /// Resolves the sync directories against the stored user config
    pub fn sync_paths(&self, user_config: &UserConfig) -> Result<SyncPaths> {
        SyncPaths::resolve(self.destination.clone(), self.source.clone(), user_config)
    }

    /// User config with this invocation's overrides applied
    pub fn merged_user_config(&self, user_config: &UserConfig) -> UserConfig {
        UserConfig {
            source_dir: self.source.clone().or_else(|| user_config.source_dir.clone()),
            destination_dir: self
                .destination
                .clone()
                .or_else(|| user_config.destination_dir.clone()),
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            source: args.source,
            destination: args.destination,
            list: args.list,
            open: args.open,
            save_config: args.save_config,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaverError;
    use std::fs;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spotlight-saver").chain(argv.iter().copied()))
            .unwrap()
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_args_default_values() {
            let args = parse(&[]);

            assert!(args.source.is_none());
            assert!(args.destination.is_none());
            assert!(!args.list);
            assert!(!args.open);
            assert!(!args.save_config);
            assert!(!args.verbose);
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_args_parse_paths_and_flags() {
            let args = parse(&["--source", "/cache", "--dest", "/pics", "-l", "-v"]);

            assert_eq!(args.source, Some(PathBuf::from("/cache")));
            assert_eq!(args.destination, Some(PathBuf::from("/pics")));
            assert!(args.list);
            assert!(args.verbose);
        }

        #[test]
        fn test_args_validate_destination_is_file() {
            let temp_dir = TempDir::new().unwrap();
            let file = temp_dir.path().join("not-a-dir");
            fs::write(&file, b"x").unwrap();

            let args = parse(&["--dest", file.to_str().unwrap()]);
            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_args_validate_missing_destination_is_allowed() {
            let temp_dir = TempDir::new().unwrap();
            let missing = temp_dir.path().join("created-later");

            let args = parse(&["--dest", missing.to_str().unwrap()]);
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_args_validate_save_config_without_paths() {
            let args = parse(&["--save-config"]);
            assert!(args.validate().is_err());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let args = parse(&["--dest", "/pics", "--open", "--save-config"]);
            let config: AppConfig = args.into();

            assert_eq!(config.destination, Some(PathBuf::from("/pics")));
            assert!(config.source.is_none());
            assert!(config.open);
            assert!(config.save_config);
        }

        #[test]
        fn test_merged_user_config_keeps_stored_values() {
            let stored = UserConfig {
                source_dir: Some(PathBuf::from("/stored/source")),
                destination_dir: Some(PathBuf::from("/stored/dest")),
            };
            let config = AppConfig {
                destination: Some(PathBuf::from("/pics")),
                ..AppConfig::default()
            };

            let merged = config.merged_user_config(&stored);
            assert_eq!(merged.destination_dir, Some(PathBuf::from("/pics")));
            assert_eq!(merged.source_dir, Some(PathBuf::from("/stored/source")));
        }

        #[test]
        fn test_broken_user_config_falls_back_for_plain_sync() {
            let config = AppConfig::default();
            let loaded = Err(SaverError::ConfigError("bad json".to_string()));

            let user_config = config.user_config_or_default(loaded).unwrap();
            assert_eq!(user_config, UserConfig::default());
        }

        #[test]
        fn test_broken_user_config_is_not_overwritten() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("config.json");
            fs::write(&path, "{ \"source_dir\": ").unwrap();

            let config = AppConfig {
                destination: Some(PathBuf::from("/pics")),
                save_config: true,
                ..AppConfig::default()
            };

            let result = config.user_config_or_default(UserConfig::load_from(&path));
            assert!(matches!(result, Err(SaverError::ConfigError(_))));
            assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"source_dir\": ");
        }

        #[test]
        fn test_sync_paths_from_app_config() {
            let config = AppConfig {
                source: Some(PathBuf::from("/cache")),
                destination: Some(PathBuf::from("/pics")),
                ..AppConfig::default()
            };

            let paths = config.sync_paths(&UserConfig::default()).unwrap();
            assert_eq!(paths, SyncPaths::new("/pics", "/cache"));
        }
    }
}
