//! Command line interface for ksketch.
//!
//! The CLI reads initial center sets and query points from JSON and drives a
//! [`KSketchIndex`](crate::sketch::KSketchIndex) over them. It is a consumer of
//! the library, not part of the index itself.

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;
