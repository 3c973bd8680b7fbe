//! Selectors over the columnar representation.
//!
//! The columnar layout opens one extra door: derived columns. Instead of
//! chasing stack table -> frame table -> category table for every sample
//! in every selection, a selector set can precompute a per-stack or
//! per-sample category column once and reuse it for every subsequent
//! selection on the same profile. The derived columns are memoized in a
//! single-slot, identity-keyed cache: they are pure functions of an
//! immutable profile, so the profile's address is a sufficient key, and
//! passing a different profile simply recomputes.
//!
//! Four aggregation strategies form a ladder of increasing
//! precomputation: direct table chase, per-stack category column,
//! per-sample category column, and a byte-packed per-sample column that
//! minimizes memory traffic in the hot loop.

use super::{bucketize_depths, selected_slice, DenseBreakdown, SelectorSet};
use crate::bisection::bisection_left;
use crate::profile::columnar::{ColumnarProfile, StackTable};
use crate::profile::{CategoryBreakdown, ProfileInfo, SampleIndexRange, TimeRange};
use crate::throughput::ThroughputAccumulator;
use std::rc::Rc;

/// Aggregation strategy for the columnar selectors, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnarStrategy {
    /// Chase stack -> frame -> category through the tables per sample
    Basic,

    /// Derived per-stack leaf-category column; one lookup per sample
    StackCategories,

    /// Derived per-sample category column; zero indirection per sample
    SampleCategories,

    /// Per-sample category column packed into bytes
    PackedSampleCategories,
}

/// Time of the first and last sample. Panics on an empty profile.
pub fn compute_base_range(profile: &ColumnarProfile) -> TimeRange {
    let times = &profile.sample_table.time_column;
    TimeRange {
        start: times[0],
        end: times[times.len() - 1],
    }
}

/// Stack depth per table entry, in one forward pass over the columns.
fn compute_stack_depth_column(stack_table: &StackTable) -> Vec<u32> {
    let mut depths = vec![0u32; stack_table.len()];
    for (i, parent) in stack_table.parent_column.iter().enumerate() {
        if let Some(parent) = parent {
            depths[i] = depths[*parent as usize] + 1;
        }
    }
    depths
}

/// Depth-density graph over the stack table's parent-walk depths.
pub fn compute_profile_graph(profile: &ColumnarProfile) -> Vec<f32> {
    let depth_column = compute_stack_depth_column(&profile.stack_table);
    let base = compute_base_range(profile);
    bucketize_depths(
        base,
        profile
            .sample_table
            .time_column
            .iter()
            .zip(&profile.sample_table.stack_index_column)
            .map(|(&time, &stack_index)| (time, depth_column[stack_index as usize])),
    )
}

/// Convert a time selection into a sample index range by bisecting the
/// time column directly.
pub fn convert_time_range_to_sample_index_range(
    profile: &ColumnarProfile,
    time_range: TimeRange,
) -> SampleIndexRange {
    let times = &profile.sample_table.time_column;
    SampleIndexRange {
        start: bisection_left(times, &time_range.start),
        end: bisection_left(times, &time_range.end),
    }
}

/// Sum of |weight| over the selection.
pub fn compute_total(profile: &ColumnarProfile, range: SampleIndexRange) -> f64 {
    selected_slice(&profile.sample_table.weight_column, range)
        .iter()
        .map(|weight| weight.abs())
        .sum()
}

/// Breakdown kernel: full table chase per sample.
fn breakdown_basic(profile: &ColumnarProfile, range: SampleIndexRange) -> DenseBreakdown {
    let mut dense = DenseBreakdown::with_category_count(profile.categories.len());
    let stacks = &profile.sample_table.stack_index_column;
    let weights = &profile.sample_table.weight_column;
    for i in range.start..range.end {
        let frame_index = profile.stack_table.frame_index_column[stacks[i] as usize];
        let category_index = profile.frame_table.category_index_column[frame_index as usize];
        dense.add(category_index as usize, weights[i]);
    }
    dense
}

/// Breakdown kernel: one hop through a derived per-stack category column.
fn breakdown_stack_categories(
    stack_category_column: &[u32],
    profile: &ColumnarProfile,
    range: SampleIndexRange,
) -> DenseBreakdown {
    let mut dense = DenseBreakdown::with_category_count(profile.categories.len());
    let stacks = &profile.sample_table.stack_index_column;
    let weights = &profile.sample_table.weight_column;
    for i in range.start..range.end {
        dense.add(stack_category_column[stacks[i] as usize] as usize, weights[i]);
    }
    dense
}

/// Breakdown kernel: direct read of a derived per-sample category column.
///
/// Generic over the column's element width so the wide and byte-packed
/// variants share one loop.
fn breakdown_sample_categories<C>(
    sample_category_column: &[C],
    weight_column: &[f64],
    category_count: usize,
    range: SampleIndexRange,
) -> DenseBreakdown
where
    C: Copy + Into<u32>,
{
    let mut dense = DenseBreakdown::with_category_count(category_count);
    for i in range.start..range.end {
        dense.add(sample_category_column[i].into() as usize, weight_column[i]);
    }
    dense
}

/// Heaviest stack index via a dense per-stack weight array over the
/// sample columns. Strictly-greater running max with a 0 threshold, as
/// everywhere else.
pub fn compute_heaviest_stack_index(
    stack_count: usize,
    stack_index_column: &[u32],
    weight_column: &[f64],
    range: SampleIndexRange,
) -> Option<u32> {
    let mut weights = vec![0.0f64; stack_count];
    let mut heaviest_weight = 0.0;
    let mut heaviest_index = None;

    for i in range.start..range.end {
        let stack_index = stack_index_column[i];
        let stack_weight = weights[stack_index as usize] + weight_column[i];
        weights[stack_index as usize] = stack_weight;
        if stack_weight > heaviest_weight {
            heaviest_weight = stack_weight;
            heaviest_index = Some(stack_index);
        }
    }

    heaviest_index
}

/// Leaf category per stack-table entry, derived once per profile.
fn derive_stack_categories(profile: &ColumnarProfile) -> Vec<u32> {
    profile
        .stack_table
        .frame_index_column
        .iter()
        .map(|&frame_index| profile.frame_table.category_index_column[frame_index as usize])
        .collect()
}

/// Category per sample, derived once per profile.
fn derive_sample_categories(profile: &ColumnarProfile) -> Vec<u32> {
    let stack_categories = derive_stack_categories(profile);
    profile
        .sample_table
        .stack_index_column
        .iter()
        .map(|&stack_index| stack_categories[stack_index as usize])
        .collect()
}

/// Byte-packed variant of [`derive_sample_categories`].
///
/// Only valid while the profile has at most 256 categories; profiles list
/// a handful in practice.
fn derive_packed_sample_categories(profile: &ColumnarProfile) -> Vec<u8> {
    debug_assert!(profile.categories.len() <= u8::MAX as usize + 1);
    derive_sample_categories(profile)
        .into_iter()
        .map(|category_index| category_index as u8)
        .collect()
}

/// Single-slot, identity-keyed memoization for a derived column.
///
/// Holds at most one entry, keyed by the address of the profile it was
/// derived from. Valid only under serial reuse of the same profile
/// reference across consecutive calls; a different profile recomputes.
#[derive(Debug, Default)]
struct MemoSlot<V> {
    entry: Option<(usize, Rc<V>)>,
}

impl<V> MemoSlot<V> {
    fn get_or_compute(&mut self, key: usize, compute: impl FnOnce() -> V) -> Rc<V> {
        match &self.entry {
            Some((cached_key, value)) if *cached_key == key => Rc::clone(value),
            _ => {
                let value = Rc::new(compute());
                self.entry = Some((key, Rc::clone(&value)));
                value
            }
        }
    }
}

/// Selector set over [`ColumnarProfile`], parameterized by strategy.
///
/// Owns the derived-column caches alongside the throughput accumulators;
/// reusing one instance across selections on the same profile is what
/// makes the memoized strategies pay off.
#[derive(Debug)]
pub struct ColumnarSelectors {
    strategy: ColumnarStrategy,
    breakdown_throughput: ThroughputAccumulator,
    heaviest_throughput: ThroughputAccumulator,
    stack_categories: MemoSlot<Vec<u32>>,
    sample_categories: MemoSlot<Vec<u32>>,
    packed_sample_categories: MemoSlot<Vec<u8>>,
}

impl ColumnarSelectors {
    pub fn new(strategy: ColumnarStrategy) -> Self {
        Self {
            strategy,
            breakdown_throughput: ThroughputAccumulator::new(),
            heaviest_throughput: ThroughputAccumulator::new(),
            stack_categories: MemoSlot::default(),
            sample_categories: MemoSlot::default(),
            packed_sample_categories: MemoSlot::default(),
        }
    }

    pub fn strategy(&self) -> ColumnarStrategy {
        self.strategy
    }
}

impl SelectorSet for ColumnarSelectors {
    type Profile = ColumnarProfile;

    fn compute_base_range(&self, profile: &ColumnarProfile) -> TimeRange {
        compute_base_range(profile)
    }

    fn compute_profile_graph(&self, profile: &ColumnarProfile) -> Vec<f32> {
        compute_profile_graph(profile)
    }

    fn convert_time_range_to_sample_index_range(
        &self,
        profile: &ColumnarProfile,
        time_range: TimeRange,
    ) -> SampleIndexRange {
        convert_time_range_to_sample_index_range(profile, time_range)
    }

    fn get_info_for_profile(
        &mut self,
        profile: &ColumnarProfile,
        range: SampleIndexRange,
    ) -> ProfileInfo {
        let identity = profile as *const ColumnarProfile as usize;
        let selected_sample_count = range.len();
        let total = compute_total(profile, range);

        let dense = match self.strategy() {
            ColumnarStrategy::Basic => self
                .breakdown_throughput
                .measure(selected_sample_count, || breakdown_basic(profile, range)),
            ColumnarStrategy::StackCategories => {
                let column = self
                    .stack_categories
                    .get_or_compute(identity, || derive_stack_categories(profile));
                self.breakdown_throughput.measure(selected_sample_count, || {
                    breakdown_stack_categories(&column, profile, range)
                })
            }
            ColumnarStrategy::SampleCategories => {
                let column = self
                    .sample_categories
                    .get_or_compute(identity, || derive_sample_categories(profile));
                self.breakdown_throughput.measure(selected_sample_count, || {
                    breakdown_sample_categories(
                        &column,
                        &profile.sample_table.weight_column,
                        profile.categories.len(),
                        range,
                    )
                })
            }
            ColumnarStrategy::PackedSampleCategories => {
                let column = self
                    .packed_sample_categories
                    .get_or_compute(identity, || derive_packed_sample_categories(profile));
                self.breakdown_throughput.measure(selected_sample_count, || {
                    breakdown_sample_categories(
                        &column,
                        &profile.sample_table.weight_column,
                        profile.categories.len(),
                        range,
                    )
                })
            }
        };
        let category_breakdown = dense.into_named(&profile.categories);

        // Unlike the normalized selectors, stack reconstruction happens
        // outside the measured pass: the index computation is the part
        // the strategies differ on.
        let heaviest_index = self
            .heaviest_throughput
            .measure(selected_sample_count, || {
                compute_heaviest_stack_index(
                    profile.stack_table.len(),
                    &profile.sample_table.stack_index_column,
                    &profile.sample_table.weight_column,
                    range,
                )
            });
        let heaviest_stack = heaviest_index
            .map(|stack_index| profile.resolve_stack(stack_index))
            .unwrap_or_default();

        ProfileInfo {
            overall_sample_count: profile.sample_table.len(),
            selected_sample_count,
            total,
            category_breakdown,
            category_breakdown_throughput: self.breakdown_throughput.average(),
            heaviest_stack,
            heaviest_stack_throughput: self.heaviest_throughput.average(),
        }
    }
}
