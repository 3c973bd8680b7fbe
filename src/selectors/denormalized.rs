//! Selectors over the denormalized representation.
//!
//! Every sample carries its stack inline, so there is no shared index to
//! aggregate by: the heaviest-stack pass keys its accumulation buckets
//! on the structural identity of the frame sequence instead.

use super::{bucketize_depths, selected_slice, SelectorSet};
use crate::bisection::bisection_left_by_key;
use crate::profile::denormalized::DenormalizedProfile;
use crate::profile::{CategoryBreakdown, ProfileInfo, SampleIndexRange, Stack, StackFrame, TimeRange};
use crate::throughput::ThroughputAccumulator;
use std::collections::HashMap;

/// Time of the first and last sample. Panics on an empty profile.
pub fn compute_base_range(profile: &DenormalizedProfile) -> TimeRange {
    let samples = &profile.samples;
    TimeRange {
        start: samples[0].time,
        end: samples[samples.len() - 1].time,
    }
}

/// Depth-density graph; a sample's depth here is its inline stack length.
pub fn compute_profile_graph(profile: &DenormalizedProfile) -> Vec<f32> {
    let base = compute_base_range(profile);
    bucketize_depths(
        base,
        profile
            .samples
            .iter()
            .map(|sample| (sample.time, sample.stack.len() as u32)),
    )
}

/// Convert a time selection into a sample index range.
///
/// Binary-searches the per-sample time field; the samples are sorted by
/// time. Boundary-inclusive at `start`, exclusive at `end`.
pub fn convert_time_range_to_sample_index_range(
    profile: &DenormalizedProfile,
    time_range: TimeRange,
) -> SampleIndexRange {
    let samples = &profile.samples;
    SampleIndexRange {
        start: bisection_left_by_key(samples, |sample| sample.time, &time_range.start),
        end: bisection_left_by_key(samples, |sample| sample.time, &time_range.end),
    }
}

/// Sum of |weight| over the selection.
pub fn compute_total(profile: &DenormalizedProfile, range: SampleIndexRange) -> f64 {
    selected_slice(&profile.samples, range)
        .iter()
        .map(|sample| sample.weight.abs())
        .sum()
}

/// Signed weight accumulated per leaf-frame category, keyed by name.
pub fn compute_category_breakdown(
    profile: &DenormalizedProfile,
    range: SampleIndexRange,
) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::new();
    for sample in selected_slice(&profile.samples, range) {
        let leaf = &sample.stack[0];
        match breakdown.get_mut(&leaf.category) {
            Some(weight) => *weight += sample.weight,
            None => {
                breakdown.insert(leaf.category.clone(), sample.weight);
            }
        }
    }
    breakdown
}

/// Single-pass heaviest-stack detection over structurally keyed buckets.
///
/// **Public** - also exercised directly by the equivalence tests
///
/// Structurally identical stacks collapse into one bucket. The running
/// maximum uses a strictly-greater comparison, so the earliest stack to
/// attain the maximum wins ties, and the initial threshold of 0 means a
/// stack whose accumulated weight never exceeds 0 is not reported even
/// when it is the only one present. Both behaviors are part of the
/// contract.
pub fn compute_heaviest_stack(
    profile: &DenormalizedProfile,
    range: SampleIndexRange,
) -> Option<Stack> {
    let mut weights: HashMap<&[StackFrame], f64> = HashMap::new();
    let mut heaviest_weight = 0.0;
    let mut heaviest: Option<&[StackFrame]> = None;

    for sample in selected_slice(&profile.samples, range) {
        let stack_weight = weights.entry(sample.stack.as_slice()).or_insert(0.0);
        *stack_weight += sample.weight;
        if *stack_weight > heaviest_weight {
            heaviest_weight = *stack_weight;
            heaviest = Some(sample.stack.as_slice());
        }
    }

    heaviest.map(|frames| frames.to_vec())
}

/// Selector set over [`DenormalizedProfile`]
#[derive(Debug, Default)]
pub struct DenormalizedSelectors {
    breakdown_throughput: ThroughputAccumulator,
    heaviest_throughput: ThroughputAccumulator,
}

impl DenormalizedSelectors {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectorSet for DenormalizedSelectors {
    type Profile = DenormalizedProfile;

    fn compute_base_range(&self, profile: &DenormalizedProfile) -> TimeRange {
        compute_base_range(profile)
    }

    fn compute_profile_graph(&self, profile: &DenormalizedProfile) -> Vec<f32> {
        compute_profile_graph(profile)
    }

    fn convert_time_range_to_sample_index_range(
        &self,
        profile: &DenormalizedProfile,
        time_range: TimeRange,
    ) -> SampleIndexRange {
        convert_time_range_to_sample_index_range(profile, time_range)
    }

    fn get_info_for_profile(
        &mut self,
        profile: &DenormalizedProfile,
        range: SampleIndexRange,
    ) -> ProfileInfo {
        let selected_sample_count = range.len();
        let total = compute_total(profile, range);
        let category_breakdown = self
            .breakdown_throughput
            .measure(selected_sample_count, || {
                compute_category_breakdown(profile, range)
            });
        let heaviest_stack = self
            .heaviest_throughput
            .measure(selected_sample_count, || {
                compute_heaviest_stack(profile, range)
            })
            .unwrap_or_default();

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
