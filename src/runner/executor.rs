//! Command dispatch
//!
//! Every resolved command line becomes a typed [`Invocation`] handed to an
//! [`Executor`]. The real executor spawns a shell subprocess and blocks on
//! it; tests substitute [`RecordingExecutor`] to assert ordering and
//! halt-on-failure behavior without spawning anything.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use std::collections::HashMap;
use std::process::{Command as StdCommand, Stdio};

/// A single shell invocation resolved from a task's command list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name of the task this line belongs to
    pub task: String,

    /// The interpolated command line
    pub line: String,

    /// Task-local environment overrides, applied on top of the context vars
    pub env: HashMap<String, String>,

    /// Whether to suppress the command echo
    pub quiet: bool,
}

/// Executes invocations in order; implementations block until each exits
pub trait Executor {
    fn run(&mut self, invocation: &Invocation, ctx: &Context) -> ExecutionResult<()>;
}

/// Executor backed by a real shell subprocess
#[derive(Debug, Default)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn run(&mut self, invocation: &Invocation, ctx: &Context) -> ExecutionResult<()> {
        if !invocation.quiet {
            ctx.print_command(&invocation.line);
        }

        let mut command = StdCommand::new(&ctx.interpreter[0]);

        // Interpreter args (e.g., "-c" for sh/bash)
        if ctx.interpreter.len() > 1 {
            command.args(&ctx.interpreter[1..]);
        }

        command.arg(&invocation.line);
        command.current_dir(&ctx.working_dir);

        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        // Context vars first, task-local overrides on top
        for (key, value) in &ctx.vars {
            command.env(key, value);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let status = command.status().map_err(|e| ExecutionError::Spawn {
            command: invocation.line.clone(),
            error: e.to_string(),
        })?;

        if !status.success() {
            return Err(ExecutionError::CommandFailed {
                command: invocation.line.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Test double that records invocations instead of spawning processes.
///
/// Optionally fails when it reaches a given command line, reporting the
/// given exit code, so halt-on-failure behavior can be asserted.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Every invocation received, in dispatch order
    pub invocations: Vec<Invocation>,

    /// Command line to fail on, with the exit code to report
    pub fail_on: Option<(String, i32)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when `line` is dispatched, reporting `code`
    pub fn failing_on(line: &str, code: i32) -> Self {
        RecordingExecutor {
            invocations: Vec::new(),
            fail_on: Some((line.to_string(), code)),
        }
    }

    /// Dispatched command lines, in order
    pub fn lines(&self) -> Vec<&str> {
        self.invocations.iter().map(|i| i.line.as_str()).collect()
    }
}

impl Executor for RecordingExecutor {
    fn run(&mut self, invocation: &Invocation, _ctx: &Context) -> ExecutionResult<()> {
        self.invocations.push(invocation.clone());

        if let Some((line, code)) = &self.fail_on {
            if line == &invocation.line {
                return Err(ExecutionError::CommandFailed {
                    command: invocation.line.clone(),
                    code: Some(*code),
                });
            }
        }

        Ok(())
    }
}
