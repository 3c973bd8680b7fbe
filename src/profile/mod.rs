//! Profile data model: three layouts of the same logical profile.
//!
//! A profile is a time-sorted sequence of samples, each carrying a signed
//! cost weight and a reference to the call stack active at that time.
//! The three representations hold identical logical data:
//! - `denormalized`: every sample carries its full stack inline
//! - `normalized`: samples reference a shared parent-linked stack table
//! - `columnar`: every table is a set of parallel column vectors
//!
//! Profiles are immutable after construction; nothing in this crate
//! mutates one.

pub mod columnar;
pub mod denormalized;
pub mod normalized;
pub mod synth;

// Re-export main types
pub use columnar::{ColumnarProfile, FrameTable, SampleTable, StackTable};
pub use denormalized::DenormalizedProfile;
pub use normalized::{Frame, NormalizedProfile, StackNode};
pub use synth::{synthesize, ProfileSize, SynthConfig};

use std::collections::HashMap;

/// One frame of a call stack: a name plus the category it aggregates under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    pub name: String,
    pub category: String,
}

/// An ordered sequence of frames, leaf frame first, root frame last.
pub type Stack = Vec<StackFrame>;

/// Category name mapped to its summed signed weight.
pub type CategoryBreakdown = HashMap<String, f64>;

/// A selection over profile time. Units are whatever the profile source
/// used; only their ordering matters here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

/// A half-open `[start, end)` range over sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleIndexRange {
    pub start: usize,
    pub end: usize,
}

impl SampleIndexRange {
    /// Number of samples selected by this range
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Aggregates handed back to the presentation layer for one selection.
///
/// The throughput figures are sliding-window averages in nanoseconds per
/// processed sample; see [`crate::throughput::ThroughputAccumulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInfo {
    pub overall_sample_count: usize,
    pub selected_sample_count: usize,

    /// Sum of |weight| over the selection
    pub total: f64,

    /// Signed weight per category. Can legitimately sum to less than
    /// `total`: categories accumulate net directional cost, while the
    /// total is absolute. That asymmetry is deliberate.
    pub category_breakdown: CategoryBreakdown,
    pub category_breakdown_throughput: f64,

    /// Heaviest stack in the selection, leaf-to-root. Empty when no
    /// stack accumulated a strictly positive weight.
    pub heaviest_stack: Stack,
    pub heaviest_stack_throughput: f64,
}
