use profile_bench::profile::{
    synthesize, ProfileInfo, SampleIndexRange, SynthConfig, TimeRange,
};
use profile_bench::selectors::{
    ColumnarSelectors, ColumnarStrategy, DenormalizedSelectors, NormalizedSelectors,
    NormalizedStrategy, SelectorSet,
};
use profile_bench::utils::config::GRAPH_BUCKET_COUNT;
use std::collections::BTreeMap;

fn test_config() -> SynthConfig {
    SynthConfig {
        sample_count: 2_000,
        ..SynthConfig::default()
    }
}

/// Reduce a ProfileInfo to its representation-independent parts
fn comparable(info: &ProfileInfo) -> (usize, usize, f64, BTreeMap<String, f64>, Vec<String>) {
    (
        info.overall_sample_count,
        info.selected_sample_count,
        info.total,
        info.category_breakdown.clone().into_iter().collect(),
        info.heaviest_stack.iter().map(|f| f.name.clone()).collect(),
    )
}

#[test]
fn test_base_range_matches_across_representations() {
    let normalized = synthesize(&test_config());
    let denormalized = normalized.to_denormalized();
    let columnar = normalized.to_columnar();

    let from_normalized = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap)
        .compute_base_range(&normalized);
    let from_denormalized = DenormalizedSelectors::new().compute_base_range(&denormalized);
    let from_columnar =
        ColumnarSelectors::new(ColumnarStrategy::Basic).compute_base_range(&columnar);

    assert_eq!(from_normalized, from_denormalized);
    assert_eq!(from_normalized, from_columnar);
}

#[test]
fn test_time_range_conversion_matches_across_representations() {
    let normalized = synthesize(&test_config());
    let denormalized = normalized.to_denormalized();
    let columnar = normalized.to_columnar();

    let norm_sel = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap);
    let denorm_sel = DenormalizedSelectors::new();
    let col_sel = ColumnarSelectors::new(ColumnarStrategy::Basic);

    let base = norm_sel.compute_base_range(&normalized);
    let span = base.end - base.start;

    // Includes ranges clamped at either end and an inverted selection.
    let probes = [
        TimeRange { start: base.start, end: base.end },
        TimeRange { start: base.start + span * 0.3, end: base.start + span * 0.7 },
        TimeRange { start: base.start - 10.0, end: base.start + span * 0.1 },
        TimeRange { start: base.end - span * 0.05, end: base.end + 10.0 },
        TimeRange { start: base.start + span * 0.6, end: base.start + span * 0.4 },
    ];

    for time_range in probes {
        let from_normalized =
            norm_sel.convert_time_range_to_sample_index_range(&normalized, time_range);
        let from_denormalized =
            denorm_sel.convert_time_range_to_sample_index_range(&denormalized, time_range);
        let from_columnar = col_sel.convert_time_range_to_sample_index_range(&columnar, time_range);

        assert_eq!(from_normalized, from_denormalized);
        assert_eq!(from_normalized, from_columnar);
        assert!(from_normalized.end <= normalized.samples.len());
    }
}

#[test]
fn test_info_matches_across_all_selector_variants() {
    let normalized = synthesize(&test_config());
    let denormalized = normalized.to_denormalized();
    let columnar = normalized.to_columnar();

    let range = SampleIndexRange { start: 250, end: 1_750 };

    let mut denorm_sel = DenormalizedSelectors::new();
    let reference = comparable(&denorm_sel.get_info_for_profile(&denormalized, range));

    for strategy in [
        NormalizedStrategy::NameKeyedMap,
        NormalizedStrategy::IndexKeyedMap,
        NormalizedStrategy::DenseArray,
    ] {
        let mut selectors = NormalizedSelectors::new(strategy);
        let info = comparable(&selectors.get_info_for_profile(&normalized, range));
        assert_eq!(info, reference, "normalized strategy {strategy:?} diverged");
    }

    for strategy in [
        ColumnarStrategy::Basic,
        ColumnarStrategy::StackCategories,
        ColumnarStrategy::SampleCategories,
        ColumnarStrategy::PackedSampleCategories,
    ] {
        let mut selectors = ColumnarSelectors::new(strategy);
        let info = comparable(&selectors.get_info_for_profile(&columnar, range));
        assert_eq!(info, reference, "columnar strategy {strategy:?} diverged");
    }
}

#[test]
fn test_info_matches_on_empty_selection() {
    let normalized = synthesize(&test_config());
    let denormalized = normalized.to_denormalized();
    let columnar = normalized.to_columnar();

    let range = SampleIndexRange { start: 100, end: 100 };

    let mut denorm_sel = DenormalizedSelectors::new();
    let reference = denorm_sel.get_info_for_profile(&denormalized, range);
    assert_eq!(reference.selected_sample_count, 0);
    assert_eq!(reference.total, 0.0);
    assert!(reference.category_breakdown.is_empty());
    assert!(reference.heaviest_stack.is_empty());

    let mut norm_sel = NormalizedSelectors::new(NormalizedStrategy::DenseArray);
    let mut col_sel = ColumnarSelectors::new(ColumnarStrategy::PackedSampleCategories);
    assert_eq!(
        comparable(&norm_sel.get_info_for_profile(&normalized, range)),
        comparable(&reference)
    );
    assert_eq!(
        comparable(&col_sel.get_info_for_profile(&columnar, range)),
        comparable(&reference)
    );
}

#[test]
fn test_graph_matches_between_normalized_and_columnar() {
    // The denormalized graph intentionally measures inline stack length
    // instead of table depth, so it is excluded from this comparison.
    let normalized = synthesize(&test_config());
    let columnar = normalized.to_columnar();

    let from_normalized = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap)
        .compute_profile_graph(&normalized);
    let from_columnar =
        ColumnarSelectors::new(ColumnarStrategy::Basic).compute_profile_graph(&columnar);

    assert_eq!(from_normalized.len(), GRAPH_BUCKET_COUNT);
    assert_eq!(from_normalized, from_columnar);
}

#[test]
fn test_graph_is_normalized_to_unit_interval() {
    let normalized = synthesize(&test_config());
    let denormalized = normalized.to_denormalized();

    let graph = DenormalizedSelectors::new().compute_profile_graph(&denormalized);
    assert_eq!(graph.len(), GRAPH_BUCKET_COUNT);
    assert!(graph.iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert!(graph.iter().any(|&v| v == 1.0));
}

#[test]
fn test_full_selection_total_is_sum_of_absolute_weights() {
    let normalized = synthesize(&test_config());
    let columnar = normalized.to_columnar();

    let expected: f64 = normalized.samples.iter().map(|s| s.weight.abs()).sum();
    let range = SampleIndexRange { start: 0, end: normalized.samples.len() };

    let mut selectors = ColumnarSelectors::new(ColumnarStrategy::Basic);
    let info = selectors.get_info_for_profile(&columnar, range);

    assert_eq!(info.total, expected);
    assert_eq!(info.selected_sample_count, normalized.samples.len());
}

#[test]
fn test_breakdown_nets_signs_while_total_does_not() {
    let normalized = synthesize(&test_config());
    let columnar = normalized.to_columnar();

    let range = SampleIndexRange { start: 0, end: normalized.samples.len() };
    let mut selectors = ColumnarSelectors::new(ColumnarStrategy::SampleCategories);
    let info = selectors.get_info_for_profile(&columnar, range);

    // The fixture carries negative weights, so the net category sum must
    // fall short of the absolute total.
    let net: f64 = info.category_breakdown.values().sum();
    assert!(net < info.total);
}

#[test]
fn test_throughput_figures_populate_after_one_selection() {
    let normalized = synthesize(&SynthConfig { sample_count: 500, ..SynthConfig::default() });

    let mut selectors = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap);
    let range = SampleIndexRange { start: 0, end: 500 };
    let info = selectors.get_info_for_profile(&normalized, range);

    assert!(info.category_breakdown_throughput.is_finite());
    assert!(info.category_breakdown_throughput >= 0.0);
    assert!(info.heaviest_stack_throughput.is_finite());
    assert!(info.heaviest_stack_throughput >= 0.0);
}
