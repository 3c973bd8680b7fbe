//! Output writers for bench results.

pub mod report;

// Re-export main types and functions
pub use report::{read_report, write_report, BenchReport, ScenarioResult};
