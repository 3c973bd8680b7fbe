//! Selectors over the normalized representation.
//!
//! Samples reference a shared stack table, so per-stack aggregation can
//! key on the table index. The category breakdown ships three
//! interchangeable accumulation strategies - name-keyed map, index-keyed
//! map, and a dense array sized to the category count - all producing
//! identical mappings; the dense one is the expected winner because it
//! avoids hashing and indirection entirely.

use super::{bucketize_depths, selected_slice, DenseBreakdown, SelectorSet};
use crate::bisection::bisection_left_by_key;
use crate::profile::normalized::{NormalizedProfile, StackNode};
use crate::profile::{CategoryBreakdown, ProfileInfo, SampleIndexRange, TimeRange};
use crate::throughput::ThroughputAccumulator;
use std::collections::HashMap;

/// Category-breakdown accumulation strategy, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedStrategy {
    /// Accumulate directly into a name-keyed map
    NameKeyedMap,

    /// Accumulate into an index-keyed map, translate to names at the end
    IndexKeyedMap,

    /// Accumulate into a dense array indexed by category index; the
    /// heaviest-stack pass likewise switches to a dense per-stack array
    DenseArray,
}

/// Time of the first and last sample. Panics on an empty profile.
pub fn compute_base_range(profile: &NormalizedProfile) -> TimeRange {
    let samples = &profile.samples;
    TimeRange {
        start: samples[0].time,
        end: samples[samples.len() - 1].time,
    }
}

/// Stack depth per table entry, in one forward pass.
///
/// A parent's index is always smaller than its child's, so the parent's
/// depth is final by the time the child is visited. Roots have depth 0.
fn compute_stack_depth_column(stacks: &[StackNode]) -> Vec<u32> {
    let mut depths = vec![0u32; stacks.len()];
    for (i, node) in stacks.iter().enumerate() {
        if let Some(parent) = node.parent {
            depths[i] = depths[parent as usize] + 1;
        }
    }
    depths
}

/// Depth-density graph over the stack table's parent-walk depths.
pub fn compute_profile_graph(profile: &NormalizedProfile) -> Vec<f32> {
    let depth_column = compute_stack_depth_column(&profile.stacks);
    let base = compute_base_range(profile);
    bucketize_depths(
        base,
        profile
            .samples
            .iter()
            .map(|sample| (sample.time, depth_column[sample.stack_index as usize])),
    )
}

/// Convert a time selection into a sample index range.
pub fn convert_time_range_to_sample_index_range(
    profile: &NormalizedProfile,
    time_range: TimeRange,
) -> SampleIndexRange {
    let samples = &profile.samples;
    SampleIndexRange {
        start: bisection_left_by_key(samples, |sample| sample.time, &time_range.start),
        end: bisection_left_by_key(samples, |sample| sample.time, &time_range.end),
    }
}

/// Sum of |weight| over the selection.
pub fn compute_total(profile: &NormalizedProfile, range: SampleIndexRange) -> f64 {
    selected_slice(&profile.samples, range)
        .iter()
        .map(|sample| sample.weight.abs())
        .sum()
}

/// Resolve a sample's leaf-frame category index through the tables.
#[inline]
fn leaf_category_index(profile: &NormalizedProfile, stack_index: u32) -> usize {
    let frame_index = profile.stacks[stack_index as usize].frame_index;
    profile.frames[frame_index as usize].category_index as usize
}

/// Strategy (a): accumulate straight into a name-keyed mapping.
pub fn compute_category_breakdown_name_keyed(
    profile: &NormalizedProfile,
    range: SampleIndexRange,
) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::new();
    for sample in selected_slice(&profile.samples, range) {
        let category = &profile.categories[leaf_category_index(profile, sample.stack_index)];
        match breakdown.get_mut(category) {
            Some(weight) => *weight += sample.weight,
            None => {
                breakdown.insert(category.clone(), sample.weight);
            }
        }
    }
    breakdown
}

/// Strategy (b): accumulate by category index, translate names once.
pub fn compute_category_breakdown_index_keyed(
    profile: &NormalizedProfile,
    range: SampleIndexRange,
) -> CategoryBreakdown {
    let mut by_index: HashMap<usize, f64> = HashMap::new();
    for sample in selected_slice(&profile.samples, range) {
        *by_index
            .entry(leaf_category_index(profile, sample.stack_index))
            .or_insert(0.0) += sample.weight;
    }
    by_index
        .into_iter()
        .map(|(category_index, weight)| (profile.categories[category_index].clone(), weight))
        .collect()
}

/// Strategy (c): dense array indexed by category index, no hashing.
pub fn compute_category_breakdown_dense(
    profile: &NormalizedProfile,
    range: SampleIndexRange,
) -> CategoryBreakdown {
    let mut dense = DenseBreakdown::with_category_count(profile.categories.len());
    for sample in selected_slice(&profile.samples, range) {
        dense.add(leaf_category_index(profile, sample.stack_index), sample.weight);
    }
    dense.into_named(&profile.categories)
}

/// Heaviest stack index via a map keyed on stack-table indices.
///
/// Strictly-greater running max: the earliest stack to attain the maximum
/// wins ties, and nothing at or below the initial 0 threshold is ever
/// reported.
pub fn compute_heaviest_stack_index_with_map(
    profile: &NormalizedProfile,
    range: SampleIndexRange,
) -> Option<u32> {
    let mut weights: HashMap<u32, f64> = HashMap::new();
    let mut heaviest_weight = 0.0;
    let mut heaviest_index = None;

    for sample in selected_slice(&profile.samples, range) {
        let stack_weight = weights.entry(sample.stack_index).or_insert(0.0);
        *stack_weight += sample.weight;
        if *stack_weight > heaviest_weight {
            heaviest_weight = *stack_weight;
            heaviest_index = Some(sample.stack_index);
        }
    }

    heaviest_index
}

/// Heaviest stack index via a dense per-stack weight array.
pub fn compute_heaviest_stack_index_with_dense_array(
    profile: &NormalizedProfile,
    range: SampleIndexRange,
) -> Option<u32> {
    let mut weights = vec![0.0f64; profile.stacks.len()];
    let mut heaviest_weight = 0.0;
    let mut heaviest_index = None;

    for sample in selected_slice(&profile.samples, range) {
        let stack_weight = weights[sample.stack_index as usize] + sample.weight;
        weights[sample.stack_index as usize] = stack_weight;
        if stack_weight > heaviest_weight {
            heaviest_weight = stack_weight;
            heaviest_index = Some(sample.stack_index);
        }
    }

    heaviest_index
}

/// Selector set over [`NormalizedProfile`], parameterized by strategy
#[derive(Debug)]
pub struct NormalizedSelectors {
    strategy: NormalizedStrategy,
    breakdown_throughput: ThroughputAccumulator,
    heaviest_throughput: ThroughputAccumulator,
}

impl NormalizedSelectors {
    pub fn new(strategy: NormalizedStrategy) -> Self {
        Self {
            strategy,
            breakdown_throughput: ThroughputAccumulator::new(),
            heaviest_throughput: ThroughputAccumulator::new(),
        }
    }

    pub fn strategy(&self) -> NormalizedStrategy {
        self.strategy
    }
}

impl SelectorSet for NormalizedSelectors {
    type Profile = NormalizedProfile;

    fn compute_base_range(&self, profile: &NormalizedProfile) -> TimeRange {
        compute_base_range(profile)
    }

    fn compute_profile_graph(&self, profile: &NormalizedProfile) -> Vec<f32> {
        compute_profile_graph(profile)
    }

    fn convert_time_range_to_sample_index_range(
        &self,
        profile: &NormalizedProfile,
        time_range: TimeRange,
    ) -> SampleIndexRange {
        convert_time_range_to_sample_index_range(profile, time_range)
    }

    fn get_info_for_profile(
        &mut self,
        profile: &NormalizedProfile,
        range: SampleIndexRange,
    ) -> ProfileInfo {
        let strategy = self.strategy;
        let selected_sample_count = range.len();
        let total = compute_total(profile, range);

        let category_breakdown = self
            .breakdown_throughput
            .measure(selected_sample_count, || match strategy {
                NormalizedStrategy::NameKeyedMap => {
                    compute_category_breakdown_name_keyed(profile, range)
                }
                NormalizedStrategy::IndexKeyedMap => {
                    compute_category_breakdown_index_keyed(profile, range)
                }
                NormalizedStrategy::DenseArray => compute_category_breakdown_dense(profile, range),
            });

        // Stack reconstruction is part of the measured pass here: this
        // representation has to walk the table to hand a stack back.
        let heaviest_stack = self
            .heaviest_throughput
            .measure(selected_sample_count, || {
                let index = match strategy {
                    NormalizedStrategy::DenseArray => {
                        compute_heaviest_stack_index_with_dense_array(profile, range)
                    }
                    _ => compute_heaviest_stack_index_with_map(profile, range),
                };
                index
                    .map(|stack_index| profile.resolve_stack(stack_index))
                    .unwrap_or_default()
            });

        ProfileInfo {
            overall_sample_count: profile.samples.len(),
            selected_sample_count,
            total,
            category_breakdown,
            category_breakdown_throughput: self.breakdown_throughput.average(),
            heaviest_stack,
            heaviest_stack_throughput: self.heaviest_throughput.average(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::normalized::{Frame, Sample};

    /// Samples at [0,10,20,30] with weights [5,-3,5,2], all on one
    /// single-frame stack "A" in category "c".
    fn single_stack_profile() -> NormalizedProfile {
        NormalizedProfile {
            samples: [(0.0, 5.0), (10.0, -3.0), (20.0, 5.0), (30.0, 2.0)]
                .into_iter()
                .map(|(time, weight)| Sample { time, stack_index: 0, weight })
                .collect(),
            stacks: vec![StackNode { parent: None, frame_index: 0 }],
            frames: vec![Frame { name: "A".to_string(), category_index: 0 }],
            categories: vec!["c".to_string()],
        }
    }

    /// Two sibling stacks under one root, in two categories.
    fn two_stack_profile() -> NormalizedProfile {
        NormalizedProfile {
            samples: vec![
                Sample { time: 0.0, stack_index: 1, weight: 5.0 },
                Sample { time: 1.0, stack_index: 2, weight: 5.0 },
                Sample { time: 2.0, stack_index: 1, weight: -1.0 },
            ],
            stacks: vec![
                StackNode { parent: None, frame_index: 0 },
                StackNode { parent: Some(0), frame_index: 1 },
                StackNode { parent: Some(0), frame_index: 2 },
            ],
            frames: vec![
                Frame { name: "root".to_string(), category_index: 0 },
                Frame { name: "alpha".to_string(), category_index: 0 },
                Frame { name: "beta".to_string(), category_index: 1 },
            ],
            categories: vec!["work".to_string(), "gc".to_string()],
        }
    }

    fn full_range(profile: &NormalizedProfile) -> SampleIndexRange {
        SampleIndexRange { start: 0, end: profile.samples.len() }
    }

    #[test]
    fn test_concrete_scenario_total_breakdown_heaviest() {
        let profile = single_stack_profile();
        let range = full_range(&profile);
        assert_eq!(compute_total(&profile, range), 15.0);

        let breakdown = compute_category_breakdown_name_keyed(&profile, range);
        assert_eq!(breakdown["c"], 9.0);

        let heaviest = compute_heaviest_stack_index_with_map(&profile, range);
        assert_eq!(heaviest, Some(0));
    }

    #[test]
    fn test_all_breakdown_strategies_agree() {
        let profile = two_stack_profile();
        let range = full_range(&profile);
        let name_keyed = compute_category_breakdown_name_keyed(&profile, range);
        let index_keyed = compute_category_breakdown_index_keyed(&profile, range);
        let dense = compute_category_breakdown_dense(&profile, range);
        assert_eq!(name_keyed, index_keyed);
        assert_eq!(name_keyed, dense);
        assert_eq!(name_keyed["work"], 4.0);
        assert_eq!(name_keyed["gc"], 5.0);
    }

    #[test]
    fn test_heaviest_strategies_agree_and_tie_break_earliest() {
        let profile = NormalizedProfile {
            samples: vec![
                Sample { time: 0.0, stack_index: 1, weight: 5.0 },
                Sample { time: 1.0, stack_index: 2, weight: 5.0 },
            ],
            ..two_stack_profile()
        };
        let range = full_range(&profile);
        // Equal accumulated weight: the stack that attained it first wins.
        assert_eq!(compute_heaviest_stack_index_with_map(&profile, range), Some(1));
        assert_eq!(
            compute_heaviest_stack_index_with_dense_array(&profile, range),
            Some(1)
        );
    }

    #[test]
    fn test_heaviest_none_when_all_weights_nonpositive() {
        let profile = NormalizedProfile {
            samples: vec![
                Sample { time: 0.0, stack_index: 0, weight: -4.0 },
                Sample { time: 1.0, stack_index: 0, weight: 2.0 },
            ],
            ..single_stack_profile()
        };
        let range = full_range(&profile);
        // Accumulates to -2: never exceeds the 0 threshold.
        assert_eq!(compute_heaviest_stack_index_with_map(&profile, range), None);
        assert_eq!(compute_heaviest_stack_index_with_dense_array(&profile, range), None);
    }

    #[test]
    fn test_empty_selection_degrades_gracefully() {
        let profile = two_stack_profile();
        let empty = SampleIndexRange { start: 1, end: 1 };
        assert_eq!(compute_total(&profile, empty), 0.0);
        assert!(compute_category_breakdown_dense(&profile, empty).is_empty());
        assert_eq!(compute_heaviest_stack_index_with_map(&profile, empty), None);
    }

    #[test]
    fn test_inverted_selection_yields_empty_info() {
        let profile = single_stack_profile();
        let mut selectors = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap);
        // Dragging right-to-left across samples at [0,10,20,30] inverts
        // the converted index range; the aggregates must come back empty
        // rather than fail on the backwards selection.
        let range = convert_time_range_to_sample_index_range(
            &profile,
            TimeRange { start: 25.0, end: 5.0 },
        );
        assert_eq!(range, SampleIndexRange { start: 3, end: 1 });

        let info = selectors.get_info_for_profile(&profile, range);
        assert_eq!(info.selected_sample_count, 0);
        assert_eq!(info.total, 0.0);
        assert!(info.category_breakdown.is_empty());
        assert!(info.heaviest_stack.is_empty());
    }

    #[test]
    fn test_depth_column_single_forward_pass() {
        let profile = two_stack_profile();
        assert_eq!(compute_stack_depth_column(&profile.stacks), vec![0, 1, 1]);
    }

    #[test]
    fn test_get_info_resolves_heaviest_stack_leaf_to_root() {
        let profile = two_stack_profile();
        let mut selectors = NormalizedSelectors::new(NormalizedStrategy::DenseArray);
        let info = selectors.get_info_for_profile(&profile, full_range(&profile));
        // Stack 1 reaches weight 5 first; stack 2 only ties it later, and
        // stack 1's later -1 does not dethrone an already-attained max.
        assert_eq!(info.heaviest_stack.len(), 2);
        assert_eq!(info.heaviest_stack[0].name, "alpha");
        assert_eq!(info.heaviest_stack[1].name, "root");
        assert_eq!(info.total, 11.0);
    }

    #[test]
    fn test_graph_matches_depth_semantics() {
        let profile = two_stack_profile();
        let graph = compute_profile_graph(&profile);
        assert_eq!(graph.len(), crate::utils::config::GRAPH_BUCKET_COUNT);
        // All sampled stacks have depth 1, so occupied buckets hit 1.0.
        assert_eq!(graph[0], 1.0);
    }
}
