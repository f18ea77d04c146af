//! Integration tests for task execution with the real shell executor

use mkrun::config::parse_config;
use mkrun::error::{ExecutionError, MkrunError};
use mkrun::runner::{Context, Registry, Runner, ShellExecutor};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn run_tasks(yaml: &str, roots: &[&str], ctx: &Context) -> Result<(), MkrunError> {
    let config = parse_config(yaml).unwrap();
    let registry = Registry::from_config(&config);
    let roots: Vec<String> = roots.iter().map(|s| s.to_string()).collect();
    Runner::new(&registry).run(&roots, ctx, &mut ShellExecutor)
}

#[test]
fn test_execute_simple_task() {
    let yaml = r#"
tasks:
  hello:
    run: echo "Hello, World!"
"#;

    let ctx = Context::new();
    assert!(run_tasks(yaml, &["hello"], &ctx).is_ok());
}

#[test]
fn test_execute_failing_task_propagates_exit_code() {
    let yaml = r#"
tasks:
  fail:
    run: exit 5
"#;

    let ctx = Context::new();
    let result = run_tasks(yaml, &["fail"], &ctx);

    match result {
        Err(MkrunError::Execution(ExecutionError::CommandFailed { code, .. })) => {
            assert_eq!(code, Some(5));
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn test_prerequisites_run_in_order() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  all:
    deps: [down, build, up]
  down:
    run: printf 'down\n' >> order.txt
  build:
    run: printf 'build\n' >> order.txt
  up:
    run: printf 'up\n' >> order.txt
"#;

    let ctx = Context::new().with_working_dir(temp_dir.path().to_path_buf());
    run_tasks(yaml, &["all"], &ctx).unwrap();

    let order = fs::read_to_string(temp_dir.path().join("order.txt")).unwrap();
    assert_eq!(order, "down\nbuild\nup\n");
}

#[test]
fn test_failure_halts_later_commands() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  multi:
    run:
      - printf 'one\n' >> steps.txt
      - exit 3
      - printf 'two\n' >> steps.txt
"#;

    let ctx = Context::new().with_working_dir(temp_dir.path().to_path_buf());
    let result = run_tasks(yaml, &["multi"], &ctx);

    assert!(result.is_err());
    let steps = fs::read_to_string(temp_dir.path().join("steps.txt")).unwrap();
    assert_eq!(steps, "one\n");
}

#[test]
fn test_failing_prerequisite_stops_dependent() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  build:
    run: exit 1
  up:
    deps: [build]
    run: printf 'up\n' >> steps.txt
"#;

    let ctx = Context::new().with_working_dir(temp_dir.path().to_path_buf());
    let result = run_tasks(yaml, &["up"], &ctx);

    assert!(result.is_err());
    assert!(!temp_dir.path().join("steps.txt").exists());
}

#[test]
fn test_context_vars_are_exported_to_commands() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  show:
    run: printf '%s' "$DOCKER_BUILDKIT" > flag.txt
"#;

    let mut vars = HashMap::new();
    vars.insert("DOCKER_BUILDKIT".to_string(), "1".to_string());

    let ctx = Context::new()
        .with_working_dir(temp_dir.path().to_path_buf())
        .with_vars(vars);
    run_tasks(yaml, &["show"], &ctx).unwrap();

    let flag = fs::read_to_string(temp_dir.path().join("flag.txt")).unwrap();
    assert_eq!(flag, "1");
}

#[test]
fn test_task_local_env_overrides_context() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  show:
    env:
      MODE: task
    run: printf '%s' "$MODE" > mode.txt
"#;

    let mut vars = HashMap::new();
    vars.insert("MODE".to_string(), "global".to_string());

    let ctx = Context::new()
        .with_working_dir(temp_dir.path().to_path_buf())
        .with_vars(vars);
    run_tasks(yaml, &["show"], &ctx).unwrap();

    let mode = fs::read_to_string(temp_dir.path().join("mode.txt")).unwrap();
    assert_eq!(mode, "task");
}

#[test]
fn test_interpolated_command_line() {
    let temp_dir = TempDir::new().unwrap();

    let yaml = r#"
tasks:
  greet:
    run: printf '%s' "restarting ${service}" > out.txt
"#;

    let mut vars = HashMap::new();
    vars.insert("service".to_string(), "rest_server".to_string());

    let ctx = Context::new()
        .with_working_dir(temp_dir.path().to_path_buf())
        .with_vars(vars);
    run_tasks(yaml, &["greet"], &ctx).unwrap();

    let out = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(out, "restarting rest_server");
}

#[test]
fn test_custom_interpreter() {
    let yaml = r#"
interpreter:
  - bash
  - -c
tasks:
  hello:
    run: echo hello
"#;

    let config = parse_config(yaml).unwrap();
    let registry = Registry::from_config(&config);

    let ctx = Context::new().with_interpreter(config.interpreter.clone().unwrap());
    let result = Runner::new(&registry).run(&["hello".to_string()], &ctx, &mut ShellExecutor);
    assert!(result.is_ok());
}
