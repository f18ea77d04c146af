//! Built-in task registry
//!
//! When no mkrun.yml exists anywhere on the search path, the runner falls
//! back to this compiled-in declaration set: the container development
//! workflow (compose lifecycle, test/coverage/lint pass-throughs) that mkrun
//! was written to drive.

use crate::config::types::{Config, Task};
use std::collections::HashMap;

/// Service the one-off and log-streaming tasks target.
const SERVICE: &str = "rest_server";

/// Build the built-in configuration.
pub fn builtin_config() -> Config {
    let mut env = HashMap::new();
    // BuildKit flags, exported before any task so image builds go through
    // the faster builder.
    env.insert("DOCKER_BUILDKIT".to_string(), "1".to_string());
    env.insert("COMPOSE_DOCKER_CLI_BUILD".to_string(), "1".to_string());

    let mut tasks = HashMap::new();

    tasks.insert(
        "all".to_string(),
        Task::aggregator("Stop, rebuild, and restart the stack", ["down", "build", "up"]),
    );
    tasks.insert(
        "build".to_string(),
        Task::with_commands("Build service images", ["docker compose build"]),
    );
    tasks.insert(
        "up".to_string(),
        Task::with_commands("Start services, detached", ["docker compose up -d"]),
    );
    tasks.insert(
        "down".to_string(),
        Task::with_commands(
            "Stop services and remove orphans",
            ["docker compose down --remove-orphans"],
        ),
    );
    tasks.insert(
        "destroy".to_string(),
        Task::with_commands(
            "Stop services, remove orphans and volumes",
            ["docker compose down --remove-orphans --volumes"],
        ),
    );
    tasks.insert(
        "test".to_string(),
        Task::with_commands(
            "Run the test suite inside the service container",
            [format!("docker compose run --rm {} pytest", SERVICE)],
        ),
    );
    tasks.insert(
        "logs".to_string(),
        Task::with_commands(
            "Stream service logs",
            [format!("docker compose logs -f {}", SERVICE)],
        ),
    );
    tasks.insert(
        "ps".to_string(),
        Task::with_commands("List service status", ["docker compose ps"]),
    );
    tasks.insert(
        "reload-code".to_string(),
        Task::with_commands(
            "Restart the service to pick up code changes",
            [format!("docker compose restart {}", SERVICE)],
        ),
    );
    tasks.insert(
        "install".to_string(),
        Task::with_commands(
            "Install declared packages including the dev group",
            ["poetry install --with dev"],
        ),
    );
    tasks.insert(
        "coverage".to_string(),
        Task::with_commands(
            "Run tests with coverage and export the report",
            [
                "pytest -vv --junitxml=reports/junit.xml",
                "coverage report",
                "coverage xml -o reports/coverage.xml",
            ],
        ),
    );
    tasks.insert(
        "lint".to_string(),
        Task::with_commands(
            "Run static-analysis hooks across all tracked files",
            ["pre-commit run --all-files"],
        ),
    );

    Config {
        name: Some("mkrun".to_string()),
        usage: Some("Container development workflow tasks".to_string()),
        env,
        interpreter: None,
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::validate_config;

    #[test]
    fn test_builtin_config_is_valid() {
        let config = builtin_config();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_builtin_aggregator_order() {
        let config = builtin_config();
        let all = config.tasks.get("all").unwrap();
        assert_eq!(all.deps, vec!["down", "build", "up"]);
        assert!(all.run.is_empty());
    }

    #[test]
    fn test_builtin_exports_buildkit_flags() {
        let config = builtin_config();
        assert_eq!(config.env.get("DOCKER_BUILDKIT"), Some(&"1".to_string()));
        assert_eq!(
            config.env.get("COMPOSE_DOCKER_CLI_BUILD"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_builtin_deps_all_defined() {
        let config = builtin_config();
        for task in config.tasks.values() {
            for dep in &task.deps {
                assert!(config.tasks.contains_key(dep), "missing dep: {}", dep);
            }
        }
    }

    #[test]
    fn test_builtin_coverage_has_three_lines() {
        let config = builtin_config();
        let coverage = config.tasks.get("coverage").unwrap();
        assert_eq!(coverage.run.len(), 3);
        assert!(coverage.run[0].contains("pytest -vv"));
        assert!(coverage.run[2].ends_with("reports/coverage.xml"));
    }
}
