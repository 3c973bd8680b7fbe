//! Selector algorithms over the three profile representations.
//!
//! Every representation answers the same four queries - base range, depth
//! graph, time-to-index range conversion, and the aggregate bundle - with
//! identical external semantics; only the internal access pattern
//! differs. One trait with multiple implementing variants, selected at
//! construction time, lets the same bench harness exercise any of them
//! without call-site changes.
//!
//! The selectors themselves are stateless pure functions over an
//! immutable profile. The only state a selector set carries is its pair
//! of throughput accumulators and, for the columnar variants, a
//! single-slot derived-column cache; both mutate under
//! `get_info_for_profile`, hence `&mut self` there.

pub mod columnar;
pub mod denormalized;
pub mod normalized;

// Re-export the selector-set variants
pub use columnar::{ColumnarSelectors, ColumnarStrategy};
pub use denormalized::DenormalizedSelectors;
pub use normalized::{NormalizedSelectors, NormalizedStrategy};

use crate::profile::{CategoryBreakdown, ProfileInfo, SampleIndexRange, TimeRange};
use crate::utils::config::GRAPH_BUCKET_COUNT;

/// Uniform selector contract consumed by the presentation/bench layer.
pub trait SelectorSet {
    type Profile;

    /// Time of the first and last sample.
    ///
    /// Precondition: the profile holds at least one sample. An empty
    /// profile is a programming error and panics on the first index.
    fn compute_base_range(&self, profile: &Self::Profile) -> TimeRange;

    /// Call-depth density curve with [`GRAPH_BUCKET_COUNT`] buckets,
    /// normalized into `[0, 1]` by the maximum observed depth.
    fn compute_profile_graph(&self, profile: &Self::Profile) -> Vec<f32>;

    /// Convert a time selection into a half-open sample index range via
    /// leftmost bisection over the (sorted) sample times.
    fn convert_time_range_to_sample_index_range(
        &self,
        profile: &Self::Profile,
        time_range: TimeRange,
    ) -> SampleIndexRange;

    /// Compute the aggregate bundle for a selection, recording throughput
    /// for the category breakdown and heaviest-stack passes.
    fn get_info_for_profile(
        &mut self,
        profile: &Self::Profile,
        range: SampleIndexRange,
    ) -> ProfileInfo;
}

/// View the items a selection covers as a slice.
///
/// **Private to the selector layer** - every slice-based aggregation
/// goes through this
///
/// An inverted range (end before start, which a right-to-left drag
/// produces through the time-range conversion) selects nothing, the
/// same way a half-open `start..end` loop would.
pub(crate) fn selected_slice<T>(items: &[T], range: SampleIndexRange) -> &[T] {
    items.get(range.start..range.end).unwrap_or(&[])
}

/// Fold per-sample (time, depth) points into the normalized graph buckets.
///
/// **Private to the selector layer** - each representation feeds its own
/// depth source through this
///
/// The global maximum depth is tracked over every sample, including the
/// `time == end` endpoint whose bucket index lands one past the last
/// bucket and is discarded. When the maximum depth stays 0 the final
/// normalization divides 0 by 0 and the curve is all-NaN; that quirk is
/// deliberate and documented rather than guarded.
pub(crate) fn bucketize_depths(
    base: TimeRange,
    points: impl Iterator<Item = (f64, u32)>,
) -> Vec<f32> {
    let mut bucket_depths = vec![0u32; GRAPH_BUCKET_COUNT];
    let mut max_depth = 0u32;
    let span = base.end - base.start;

    for (time, depth) in points {
        max_depth = max_depth.max(depth);
        // A zero-span base range makes the bucket index NaN; the source's
        // typed-array write at a NaN index is silently discarded, so the
        // write is skipped here too.
        if span > 0.0 {
            let bucket = (((time - base.start) / span) * GRAPH_BUCKET_COUNT as f64) as usize;
            if let Some(slot) = bucket_depths.get_mut(bucket) {
                *slot = (*slot).max(depth);
            }
        }
    }

    bucket_depths
        .iter()
        .map(|&depth| depth as f32 / max_depth as f32)
        .collect()
}

/// Dense category accumulator indexed directly by category index.
///
/// Strategy (c) of the breakdown comparison: no hashing, no indirection,
/// a single fixed-size array sized to the category count. The `seen`
/// mask keeps the final mapping identical to the map-based strategies -
/// a category that appeared but cancelled to exactly 0.0 stays in the
/// result, one that never appeared does not.
pub(crate) struct DenseBreakdown {
    weights: Vec<f64>,
    seen: Vec<bool>,
}

impl DenseBreakdown {
    pub(crate) fn with_category_count(category_count: usize) -> Self {
        Self {
            weights: vec![0.0; category_count],
            seen: vec![false; category_count],
        }
    }

    #[inline]
    pub(crate) fn add(&mut self, category_index: usize, weight: f64) {
        self.weights[category_index] += weight;
        self.seen[category_index] = true;
    }

    /// Translate the dense indices into a name-keyed mapping, once.
    pub(crate) fn into_named(self, categories: &[String]) -> CategoryBreakdown {
        categories
            .iter()
            .zip(self.weights)
            .zip(self.seen)
            .filter(|&(_, seen)| seen)
            .map(|((name, weight), _)| (name.clone(), weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucketize_length_is_fixed() {
        let base = TimeRange { start: 0.0, end: 10.0 };
        let graph = bucketize_depths(base, [(0.0, 1), (5.0, 3), (10.0, 2)].into_iter());
        assert_eq!(graph.len(), GRAPH_BUCKET_COUNT);
    }

    #[test]
    fn test_bucketize_normalizes_by_global_max() {
        let base = TimeRange { start: 0.0, end: 10.0 };
        let graph = bucketize_depths(base, [(0.0, 2), (5.0, 4)].into_iter());
        assert_eq!(graph[0], 0.5);
        assert_eq!(graph[GRAPH_BUCKET_COUNT / 2], 1.0);
        assert!(graph.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_bucketize_discards_endpoint_bucket_but_counts_its_depth() {
        let base = TimeRange { start: 0.0, end: 10.0 };
        // The endpoint sample has the deepest stack; it sets the global
        // max even though its own bucket write lands out of range.
        let graph = bucketize_depths(base, [(0.0, 2), (10.0, 4)].into_iter());
        assert_eq!(graph[0], 0.5);
        assert!(graph[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_bucketize_zero_max_depth_yields_nan_curve() {
        let base = TimeRange { start: 0.0, end: 10.0 };
        let graph = bucketize_depths(base, [(0.0, 0), (10.0, 0)].into_iter());
        assert!(graph.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_bucketize_zero_span_discards_every_write() {
        let base = TimeRange { start: 5.0, end: 5.0 };
        let graph = bucketize_depths(base, [(5.0, 2), (5.0, 3)].into_iter());
        // The depths still set the global max, so the curve is all-zero
        // rather than all-NaN.
        assert!(graph.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_selected_slice_is_empty_for_inverted_range() {
        let items = [10, 20, 30, 40];
        let inverted = SampleIndexRange { start: 3, end: 1 };
        assert!(selected_slice(&items, inverted).is_empty());
        let forward = SampleIndexRange { start: 1, end: 3 };
        assert_eq!(selected_slice(&items, forward), &[20, 30]);
    }

    #[test]
    fn test_dense_breakdown_keeps_cancelled_categories() {
        let categories = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut dense = DenseBreakdown::with_category_count(3);
        dense.add(0, 5.0);
        dense.add(0, -5.0);
        dense.add(2, 1.5);
        let named = dense.into_named(&categories);
        assert_eq!(named.len(), 2);
        assert_eq!(named["a"], 0.0);
        assert_eq!(named["c"], 1.5);
        assert!(!named.contains_key("b"));
    }
}
