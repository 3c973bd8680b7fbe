//! Profile Bench
//!
//! Computes summary statistics over a performance-profiler sample set
//! (total cost, per-category cost breakdown, heaviest call stack, and a
//! time-bucketed call-depth graph) across three data representations of
//! the same logical profile, and measures which aggregation strategy is
//! fastest under each representation.
//!
//! This crate provides the core implementation for the
//! `profile-bench` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! profile-bench bench --size medium
//! profile-bench --help
//! ```

pub mod bisection;
pub mod commands;
pub mod output;
pub mod profile;
pub mod selectors;
pub mod throughput;
pub mod utils;
