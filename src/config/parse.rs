//! Configuration file parsing and discovery

use crate::config::defaults;
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, MkrunError};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["mkrun.yml", "mkrun.yaml"];

/// Find the configuration file by searching current and parent directories,
/// then the user-level config directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.exists() && config_path.is_file() {
                return Ok(config_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    // Reached the filesystem root; fall back to the user config directory
    if let Some(dirs) = ProjectDirs::from("", "", "mkrun") {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = dirs.config_dir().join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.exists() && config_path.is_file() {
                return Ok(config_path);
            }
        }
    }

    Err(ConfigError::NotFound(searched_paths.join(", ")))
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, MkrunError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, MkrunError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery.
///
/// When no config file exists anywhere on the search path, the built-in
/// task registry is used instead; the returned path is `None` in that case.
pub fn parse_config_auto() -> Result<(Config, Option<PathBuf>), MkrunError> {
    match find_config_file() {
        Ok(config_path) => {
            let config = parse_config_file(&config_path)?;
            Ok((config, Some(config_path)))
        }
        Err(ConfigError::NotFound(_)) => Ok((defaults::builtin_config(), None)),
        Err(e) => Err(e.into()),
    }
}
