//! Configuration validation
//!
//! Shallow structural checks on a parsed configuration. Graph-level checks
//! (unknown prerequisites, cycles) happen at resolution time in the runner,
//! so a registry with a bad subgraph still allows unrelated tasks to run.

use crate::config::types::{Config, Task};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    for key in config.env.keys() {
        validate_env_key(key)?;
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    // Task names become CLI subcommands
    if name.is_empty() {
        return Err(ConfigError::Invalid("Task name cannot be empty".to_string()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "Task name '{}' cannot contain whitespace",
            name
        )));
    }

    for dep in &task.deps {
        if dep.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Task '{}' has an empty prerequisite name",
                name
            )));
        }
    }

    for key in task.env.keys() {
        validate_env_key(key)?;
    }

    Ok(())
}

fn validate_env_key(key: &str) -> ConfigResult<()> {
    if key.is_empty() || key.contains('=') {
        return Err(ConfigError::Invalid(format!(
            "Invalid environment variable name: '{}'",
            key
        )));
    }
    Ok(())
}
