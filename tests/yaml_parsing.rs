//! Integration tests for YAML parsing

mod common;

use mkrun::config::{parse_config, parse_config_file, validate_config};

#[test]
fn test_parse_complete_config() {
    let yaml = r#"
name: my-app
usage: My test application

env:
  DOCKER_BUILDKIT: "1"
  COMPOSE_DOCKER_CLI_BUILD: "1"

tasks:
  all:
    usage: Stop, rebuild, and restart the stack
    deps: [down, build, up]

  build:
    usage: Build service images
    run: docker compose build

  up:
    usage: Start services, detached
    run: docker compose up -d

  down:
    usage: Stop services and remove orphans
    run: docker compose down --remove-orphans

  coverage:
    usage: Run tests with coverage
    run:
      - pytest -vv --junitxml=reports/junit.xml
      - coverage report
      - coverage xml -o reports/coverage.xml
"#;

    let config = parse_config(yaml).unwrap();
    validate_config(&config).unwrap();

    assert_eq!(config.name, Some("my-app".to_string()));
    assert_eq!(config.usage, Some("My test application".to_string()));
    assert_eq!(config.tasks.len(), 5);
    assert_eq!(config.env.len(), 2);

    // Aggregator task: prerequisites only, no commands
    let all = config.tasks.get("all").unwrap();
    assert_eq!(all.deps, vec!["down", "build", "up"]);
    assert!(all.run.is_empty());

    // Single-string run becomes one command line
    let build = config.tasks.get("build").unwrap();
    assert_eq!(build.run, vec!["docker compose build"]);

    // Multi-line run preserves order
    let coverage = config.tasks.get("coverage").unwrap();
    assert_eq!(coverage.run.len(), 3);
    assert_eq!(coverage.run[1], "coverage report");
}

#[test]
fn test_parse_config_from_file() {
    let (_temp_dir, config_path) = common::create_test_config(
        r#"
tasks:
  lint:
    usage: Run static-analysis hooks
    run: pre-commit run --all-files
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    assert!(config.tasks.contains_key("lint"));
}

#[test]
fn test_parse_invalid_yaml_fails() {
    let result = parse_config("tasks: [not: a: map");
    assert!(result.is_err());
}

#[test]
fn test_parse_task_with_local_env() {
    let yaml = r#"
tasks:
  test:
    env:
      PYTEST_ADDOPTS: "-x"
    run: docker compose run --rm rest_server pytest
"#;

    let config = parse_config(yaml).unwrap();
    let task = config.tasks.get("test").unwrap();
    assert_eq!(task.env.get("PYTEST_ADDOPTS"), Some(&"-x".to_string()));
}

#[test]
fn test_validation_rejects_whitespace_task_name() {
    let yaml = r#"
tasks:
  "bad name":
    run: echo nope
"#;

    let config = parse_config(yaml).unwrap();
    assert!(validate_config(&config).is_err());
}
