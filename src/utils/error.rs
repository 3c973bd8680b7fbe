//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Error raised when bisection bounds fall outside the searched slice.
///
/// The valid bounds for a slice of length `len` are `[0, len]`; both
/// endpoints of the search window must lie within them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("low and high must lie within 0..={len} (got {low}..{high})")]
pub struct RangeError {
    pub low: usize,
    pub high: usize,
    pub len: usize,
}

/// Errors that can occur while writing or reading a bench report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read report: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize report: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid report path: {0}")]
    InvalidPath(String),
}
