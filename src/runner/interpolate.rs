//! Variable interpolation for command lines
//!
//! Replaces `${var}` placeholders using the context variable map first and
//! process environment variables second. Unknown placeholders are left
//! intact so lines like `echo ${PATH}` survive even when the shell is meant
//! to expand them.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;

/// Upper bound on expansion passes before declaring a cycle.
const MAX_PASSES: usize = 16;

/// Interpolate variables in a string
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let re = pattern();
    let mut result = s.to_string();

    // Fixpoint loop so a variable may expand to another ${var}
    for _ in 0..MAX_PASSES {
        let mut changed = false;

        result = re
            .replace_all(&result, |caps: &regex::Captures| {
                let name = &caps[1];

                if let Some(value) = vars.get(name) {
                    changed = true;
                    return value.clone();
                }
                if let Ok(value) = env::var(name) {
                    changed = true;
                    return value;
                }

                // Unknown variable, leave the placeholder in place
                format!("${{{}}}", name)
            })
            .to_string();

        if !changed {
            return Ok(result);
        }
    }

    Err(InterpolationError::RecursiveInterpolation(s.to_string()))
}

/// Interpolate all values in a map
pub fn interpolate_map(
    map: &HashMap<String, String>,
    vars: &HashMap<String, String>,
) -> InterpolationResult<HashMap<String, String>> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), interpolate(v, vars)?)))
        .collect()
}

fn pattern() -> Regex {
    // Brace form only; bare $var is left for the shell
    Regex::new(r"\$\{([A-Za-z0-9_]+)\}").unwrap()
}
