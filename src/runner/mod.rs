//! Task execution engine
//!
//! This module handles prerequisite resolution, command dispatch, and the
//! execution context shared by every spawned subprocess.

pub mod context;
pub mod executor;
pub mod interpolate;
pub mod resolve;
pub mod task;

// Re-export main types
pub use context::*;
pub use executor::*;
pub use interpolate::*;
pub use resolve::*;
pub use task::*;
