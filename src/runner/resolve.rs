//! Prerequisite resolution
//!
//! Linearizes the prerequisite graph by depth-first traversal: every
//! prerequisite of a task appears before that task, no task appears twice
//! even when reachable through multiple paths or multiple roots, and ties
//! between independent subtrees follow declaration order. Cycles and
//! unknown names are reported here, before anything executes.

use crate::error::{ConfigError, ConfigResult};
use crate::runner::task::{Registry, Task};
use std::collections::HashSet;

/// Resolve the requested root tasks into a deduplicated execution order
pub fn resolve<'a>(registry: &'a Registry, roots: &[String]) -> ConfigResult<Vec<&'a Task>> {
    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut path = Vec::new();

    for root in roots {
        visit(registry, root, &mut done, &mut path, &mut order)?;
    }

    Ok(order)
}

fn visit<'a>(
    registry: &'a Registry,
    name: &str,
    done: &mut HashSet<String>,
    path: &mut Vec<String>,
    order: &mut Vec<&'a Task>,
) -> ConfigResult<()> {
    if done.contains(name) {
        return Ok(());
    }

    // Revisiting a task still on the current path means a cycle; name the
    // offending loop from its first occurrence.
    if let Some(pos) = path.iter().position(|n| n == name) {
        let mut cycle: Vec<String> = path[pos..].to_vec();
        cycle.push(name.to_string());
        return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
    }

    let task = registry
        .get(name)
        .ok_or_else(|| ConfigError::TaskNotFound(name.to_string()))?;

    path.push(name.to_string());
    for dep in &task.deps {
        visit(registry, dep, done, path, order)?;
    }
    path.pop();

    done.insert(name.to_string());
    order.push(task);

    Ok(())
}
