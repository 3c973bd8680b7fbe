//! CLI command implementations.
//!
//! Commands orchestrate the library components: they pick a profile
//! size and selector set, run the selection sweep, and write results.

pub mod bench;

// Re-export main command functions
pub use bench::{execute_bench, validate_args, BenchArgs, SelectorSetKind};
