//! Mkrun - a Makefile-style task runner
//!
//! Mkrun resolves named tasks and their declared prerequisites into a
//! deterministic execution order, then dispatches each task's shell command
//! lines sequentially, stopping at the first non-zero exit status.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{MkrunError, Result};

/// Current version of Mkrun
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
