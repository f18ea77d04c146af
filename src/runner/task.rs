//! Runtime task registry and the execution driver
//!
//! The registry is built once from configuration and stays immutable for
//! the rest of the run. The [`Runner`] performs a single
//! resolve-then-execute pass: linearize the prerequisite graph, then
//! dispatch each task's command lines through an [`Executor`], stopping at
//! the first failure.

use crate::config;
use crate::error::Result;
use crate::runner::resolve::resolve;
use crate::runner::{interpolate, interpolate_map, Context, Executor, Invocation};
use std::collections::HashMap;

/// Runtime task representation
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is hidden from help
    pub private: bool,

    /// Whether command echo is suppressed
    pub quiet: bool,

    /// Prerequisite task names, in declaration order
    pub deps: Vec<String>,

    /// Shell command lines, in order
    pub run: Vec<String>,

    /// Task-local environment overrides
    pub env: HashMap<String, String>,
}

impl Task {
    /// Create a runtime task from its configuration
    pub fn from_config(name: String, config: config::Task) -> Self {
        Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            quiet: config.quiet,
            deps: config.deps,
            run: config.run,
            env: config.env,
        }
    }
}

/// Immutable task registry, keyed by task name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tasks: HashMap<String, Task>,
}

impl Registry {
    /// Build the registry from a parsed configuration
    pub fn from_config(config: &config::Config) -> Self {
        let tasks = config
            .tasks
            .iter()
            .map(|(name, task)| {
                (
                    name.clone(),
                    Task::from_config(name.clone(), task.clone()),
                )
            })
            .collect();

        Registry { tasks }
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Task names in sorted order (for listings)
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Drives a single resolve-then-execute pass over the registry
pub struct Runner<'a> {
    registry: &'a Registry,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Runner { registry }
    }

    /// Run the requested tasks and their prerequisites in dependency order.
    ///
    /// Prerequisites shared between roots execute once. The first failing
    /// command aborts the remaining sequence and its error is returned.
    pub fn run(
        &self,
        roots: &[String],
        ctx: &Context,
        executor: &mut dyn Executor,
    ) -> Result<()> {
        // Resolve everything up front: an unknown task or a cycle means
        // nothing spawns.
        let order = resolve(self.registry, roots)?;

        for task in order {
            ctx.print_task_start(&task.name);

            let env = interpolate_map(&task.env, &ctx.vars)?;

            for line in &task.run {
                let line = interpolate(line, &ctx.vars)?;
                let invocation = Invocation {
                    task: task.name.clone(),
                    line,
                    env: env.clone(),
                    quiet: task.quiet,
                };
                executor.run(&invocation, ctx)?;
            }

            ctx.print_task_complete(&task.name);
        }

        Ok(())
    }
}
