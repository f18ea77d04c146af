//! Core configuration types
//!
//! This module defines the data structures that represent an mkrun.yml
//! configuration file: the task registry plus the environment exported to
//! every spawned command.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Environment variables exported before any task runs
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Tasks defined in the configuration
    #[serde(default)]
    pub tasks: HashMap<String, Task>,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help)
    #[serde(default)]
    pub private: bool,

    /// Whether this task should run quietly (no command echo)
    #[serde(default)]
    pub quiet: bool,

    /// Prerequisite task names, run before this task's own commands.
    /// Declaration order is execution order for independent prerequisites.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,

    /// Shell command lines to execute, in order. Empty for a task that
    /// exists only to aggregate prerequisites.
    #[serde(default, deserialize_with = "deserialize_run_lines")]
    pub run: Vec<String>,

    /// Task-local environment overrides for this task's commands
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

impl Task {
    /// Convenience constructor for statically declared tasks.
    pub fn with_commands<I, S>(usage: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            usage: Some(usage.to_string()),
            run: lines.into_iter().map(Into::into).collect(),
            ..Task::default()
        }
    }

    /// Convenience constructor for a pure aggregator task.
    pub fn aggregator<I, S>(usage: &str, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            usage: Some(usage.to_string()),
            deps: deps.into_iter().map(Into::into).collect(),
            ..Task::default()
        }
    }
}

/// Custom deserializer for run lines that handles both a single string
/// and an array of strings
fn deserialize_run_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string command
        Value::String(s) => Ok(vec![s]),
        // Array of command lines
        Value::Sequence(seq) => {
            let mut lines = Vec::new();
            for item in seq {
                match item {
                    Value::String(s) => lines.push(s),
                    _ => return Err(D::Error::custom("run lines must be strings")),
                }
            }
            Ok(lines)
        }
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string or array of strings")),
    }
}
