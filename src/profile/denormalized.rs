//! Denormalized representation: every sample carries its full stack inline.
//!
//! The simplest layout and the most redundant one - identical stacks are
//! duplicated per sample, and frames repeat their name and category
//! strings in every stack that contains them.

use super::Stack;

/// One profiler observation with its stack materialized inline.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub stack: Stack,

    /// Signed cost; the sign denotes direction (e.g. allocation vs. free)
    pub weight: f64,
}

/// A profile whose samples each own a complete copy of their stack.
///
/// Samples must be sorted ascending by time.
#[derive(Debug, Clone, Default)]
pub struct DenormalizedProfile {
    pub samples: Vec<Sample>,
}
