//! Bench command implementation.
//!
//! The bench command:
//! 1. Synthesizes a deterministic profile of the requested size
//! 2. Materializes the representation(s) under test
//! 3. Computes the depth graph once per selector set
//! 4. Sweeps sliding time-range selections across the base range
//! 5. Prints a throughput comparison and optionally writes a JSON report

use crate::output::{write_report, BenchReport, ScenarioResult};
use crate::profile::{
    synthesize, ColumnarProfile, DenormalizedProfile, NormalizedProfile, ProfileSize, SynthConfig,
    TimeRange,
};
use crate::selectors::{
    ColumnarSelectors, ColumnarStrategy, DenormalizedSelectors, NormalizedSelectors,
    NormalizedStrategy, SelectorSet,
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Representation plus aggregation strategy exercised by a bench run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectorSetKind {
    /// Inline stacks, name-keyed aggregation
    Denormalized,
    /// Stack table, name-keyed category map
    Normalized,
    /// Stack table, index-keyed category map
    NormalizedIndexKeyed,
    /// Stack table, dense category and stack arrays
    NormalizedDense,
    /// Parallel columns, per-sample table chase
    Columnar,
    /// Parallel columns, memoized per-stack category column
    ColumnarStackCategories,
    /// Parallel columns, memoized per-sample category column
    ColumnarSampleCategories,
    /// Parallel columns, byte-packed per-sample category column
    ColumnarPacked,
}

impl SelectorSetKind {
    /// Every selector set, in comparison order
    pub fn all() -> [SelectorSetKind; 8] {
        [
            SelectorSetKind::Denormalized,
            SelectorSetKind::Normalized,
            SelectorSetKind::NormalizedIndexKeyed,
            SelectorSetKind::NormalizedDense,
            SelectorSetKind::Columnar,
            SelectorSetKind::ColumnarStackCategories,
            SelectorSetKind::ColumnarSampleCategories,
            SelectorSetKind::ColumnarPacked,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectorSetKind::Denormalized => "denormalized",
            SelectorSetKind::Normalized => "normalized-name-keyed",
            SelectorSetKind::NormalizedIndexKeyed => "normalized-index-keyed",
            SelectorSetKind::NormalizedDense => "normalized-dense",
            SelectorSetKind::Columnar => "columnar-basic",
            SelectorSetKind::ColumnarStackCategories => "columnar-stack-categories",
            SelectorSetKind::ColumnarSampleCategories => "columnar-sample-categories",
            SelectorSetKind::ColumnarPacked => "columnar-packed",
        }
    }
}

/// Arguments for the bench command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct BenchArgs {
    /// Selector set to exercise; None runs the full comparison
    pub selector_set: Option<SelectorSetKind>,

    /// Synthetic profile size preset
    pub size: ProfileSize,

    /// Number of range selections to sweep per selector set
    pub iterations: usize,

    /// Selection width as a fraction of the base range, in (0, 1]
    pub window_fraction: f64,

    /// PRNG seed for profile synthesis
    pub seed: u64,

    /// Optional output path for the JSON report
    pub output_json: Option<PathBuf>,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            selector_set: None,
            size: ProfileSize::Small,
            iterations: crate::utils::config::DEFAULT_ITERATIONS,
            window_fraction: 0.25,
            seed: 0x5eed_cafe,
            output_json: None,
        }
    }
}

/// Validate bench arguments
///
/// **Public** - can be called before execute_bench for early validation
pub fn validate_args(args: &BenchArgs) -> Result<()> {
    if args.iterations == 0 {
        anyhow::bail!("iterations must be greater than 0");
    }

    if args.iterations > 1_000_000 {
        anyhow::bail!("iterations is too large (max 1,000,000)");
    }

    if !(args.window_fraction > 0.0 && args.window_fraction <= 1.0) {
        anyhow::bail!("window fraction must lie in (0, 1]");
    }

    Ok(())
}

/// Execute the bench command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Report write failures when an output path was given
pub fn execute_bench(args: BenchArgs) -> Result<()> {
    let start_time = Instant::now();

    let kinds: Vec<SelectorSetKind> = match args.selector_set {
        Some(kind) => vec![kind],
        None => SelectorSetKind::all().to_vec(),
    };

    info!(
        "Step 1/4: Synthesizing {} profile ({} samples, seed {:#x})...",
        args.size.label(),
        args.size.sample_count(),
        args.seed
    );
    let normalized = synthesize(&SynthConfig {
        sample_count: args.size.sample_count(),
        seed: args.seed,
        ..SynthConfig::default()
    });

    info!("Step 2/4: Materializing representations...");
    let needs_denormalized = kinds.iter().any(|k| matches!(k, SelectorSetKind::Denormalized));
    let needs_columnar = kinds.iter().any(|k| {
        matches!(
            k,
            SelectorSetKind::Columnar
                | SelectorSetKind::ColumnarStackCategories
                | SelectorSetKind::ColumnarSampleCategories
                | SelectorSetKind::ColumnarPacked
        )
    });
    let denormalized = needs_denormalized.then(|| normalized.to_denormalized());
    let columnar = needs_columnar.then(|| normalized.to_columnar());

    info!(
        "Step 3/4: Running {} selection(s) across {} selector set(s)...",
        args.iterations,
        kinds.len()
    );
    let mut results = Vec::with_capacity(kinds.len());
    for kind in &kinds {
        let result = run_selector_set(
            *kind,
            &normalized,
            denormalized.as_ref(),
            columnar.as_ref(),
            args.iterations,
            args.window_fraction,
        );
        info!(
            "  {}: breakdown {:.1} ns/sample, heaviest {:.1} ns/sample",
            result.selector_set,
            result.category_breakdown_throughput_ns,
            result.heaviest_stack_throughput_ns
        );
        results.push(result);
    }

    print_comparison(&results);

    let report = BenchReport::new(args.size.label().to_string(), args.iterations, results);
    if let Some(path) = &args.output_json {
        info!("Step 4/4: Writing report...");
        write_report(&report, path).context("Failed to write bench report")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Step 4/4: Skipping report output (no path requested)");
    }

    let elapsed = start_time.elapsed();
    info!("Bench completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Run the selection sweep for one selector set
///
/// **Private** - dispatches to the right representation and strategy
fn run_selector_set(
    kind: SelectorSetKind,
    normalized: &NormalizedProfile,
    denormalized: Option<&DenormalizedProfile>,
    columnar: Option<&ColumnarProfile>,
    iterations: usize,
    window_fraction: f64,
) -> ScenarioResult {
    debug!("Running selector set: {}", kind.label());

    match kind {
        SelectorSetKind::Denormalized => {
            let mut selectors = DenormalizedSelectors::new();
            run_scenario(
                kind.label(),
                &mut selectors,
                denormalized.expect("denormalized representation was materialized"),
                iterations,
                window_fraction,
            )
        }
        SelectorSetKind::Normalized => {
            let mut selectors = NormalizedSelectors::new(NormalizedStrategy::NameKeyedMap);
            run_scenario(kind.label(), &mut selectors, normalized, iterations, window_fraction)
        }
        SelectorSetKind::NormalizedIndexKeyed => {
            let mut selectors = NormalizedSelectors::new(NormalizedStrategy::IndexKeyedMap);
            run_scenario(kind.label(), &mut selectors, normalized, iterations, window_fraction)
        }
        SelectorSetKind::NormalizedDense => {
            let mut selectors = NormalizedSelectors::new(NormalizedStrategy::DenseArray);
            run_scenario(kind.label(), &mut selectors, normalized, iterations, window_fraction)
        }
        SelectorSetKind::Columnar => {
            let mut selectors = ColumnarSelectors::new(ColumnarStrategy::Basic);
            run_scenario(
                kind.label(),
                &mut selectors,
                columnar.expect("columnar representation was materialized"),
                iterations,
                window_fraction,
            )
        }
        SelectorSetKind::ColumnarStackCategories => {
            let mut selectors = ColumnarSelectors::new(ColumnarStrategy::StackCategories);
            run_scenario(
                kind.label(),
                &mut selectors,
                columnar.expect("columnar representation was materialized"),
                iterations,
                window_fraction,
            )
        }
        SelectorSetKind::ColumnarSampleCategories => {
            let mut selectors = ColumnarSelectors::new(ColumnarStrategy::SampleCategories);
            run_scenario(
                kind.label(),
                &mut selectors,
                columnar.expect("columnar representation was materialized"),
                iterations,
                window_fraction,
            )
        }
        SelectorSetKind::ColumnarPacked => {
            let mut selectors = ColumnarSelectors::new(ColumnarStrategy::PackedSampleCategories);
            run_scenario(
                kind.label(),
                &mut selectors,
                columnar.expect("columnar representation was materialized"),
                iterations,
                window_fraction,
            )
        }
    }
}

/// Sweep sliding time-range selections across the base range.
///
/// Generic over the selector contract, so every representation and
/// strategy runs through the same harness without call-site changes.
fn run_scenario<S: SelectorSet>(
    label: &str,
    selectors: &mut S,
    profile: &S::Profile,
    iterations: usize,
    window_fraction: f64,
) -> ScenarioResult {
    let graph = selectors.compute_profile_graph(profile);
    debug!("{}: graph has {} buckets", label, graph.len());

    let base = selectors.compute_base_range(profile);
    let span = base.end - base.start;
    let width = span * window_fraction;

    let mut last_info = None;
    for i in 0..iterations {
        // Slide the selection window across the base range, like a user
        // dragging a selection through the timeline.
        let offset = if iterations > 1 {
            (span - width) * i as f64 / (iterations - 1) as f64
        } else {
            0.0
        };
        let time_range = TimeRange {
            start: base.start + offset,
            end: base.start + offset + width,
        };
        let index_range = selectors.convert_time_range_to_sample_index_range(profile, time_range);
        last_info = Some(selectors.get_info_for_profile(profile, index_range));
    }

    let info = last_info.expect("iterations is validated to be non-zero");
    ScenarioResult {
        selector_set: label.to_string(),
        overall_sample_count: info.overall_sample_count,
        selected_sample_count: info.selected_sample_count,
        total: info.total,
        category_breakdown: info.category_breakdown.into_iter().collect(),
        heaviest_stack: info.heaviest_stack.into_iter().map(|frame| frame.name).collect(),
        category_breakdown_throughput_ns: info.category_breakdown_throughput,
        heaviest_stack_throughput_ns: info.heaviest_stack_throughput,
    }
}

/// Print the comparison table to stdout
///
/// **Private** - human-readable summary; the JSON report carries the data
fn print_comparison(results: &[ScenarioResult]) {
    println!("\n{}", "=".repeat(80));
    println!("THROUGHPUT COMPARISON (ns per sample, lower is better)");
    println!("{}", "=".repeat(80));
    println!(
        "{:<28} {:>18} {:>18}",
        "selector set", "category breakdown", "heaviest stack"
    );
    for result in results {
        println!(
            "{:<28} {:>18.2} {:>18.2}",
            result.selector_set,
            result.category_breakdown_throughput_ns,
            result.heaviest_stack_throughput_ns
        );
    }
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_defaults_are_valid() {
        assert!(validate_args(&BenchArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_zero_iterations() {
        let args = BenchArgs { iterations: 0, ..Default::default() };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_iterations_too_large() {
        let args = BenchArgs { iterations: 2_000_000, ..Default::default() };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_window_fraction_bounds() {
        assert!(validate_args(&BenchArgs { window_fraction: 0.0, ..Default::default() }).is_err());
        assert!(validate_args(&BenchArgs { window_fraction: 1.5, ..Default::default() }).is_err());
        assert!(validate_args(&BenchArgs { window_fraction: 1.0, ..Default::default() }).is_ok());
    }

    #[test]
    fn test_all_selector_sets_have_distinct_labels() {
        let labels: Vec<&str> = SelectorSetKind::all().iter().map(|k| k.label()).collect();
        let mut deduped = labels.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }

    #[test]
    fn test_run_scenario_produces_consistent_results_across_sets() {
        let normalized = synthesize(&SynthConfig {
            sample_count: 1_000,
            ..SynthConfig::default()
        });
        let denormalized = normalized.to_denormalized();
        let columnar = normalized.to_columnar();

        let results: Vec<ScenarioResult> = SelectorSetKind::all()
            .iter()
            .map(|&kind| {
                run_selector_set(kind, &normalized, Some(&denormalized), Some(&columnar), 5, 0.5)
            })
            .collect();

        let reference = &results[0];
        for result in &results[1..] {
            assert_eq!(result.overall_sample_count, reference.overall_sample_count);
            assert_eq!(result.selected_sample_count, reference.selected_sample_count);
            assert_eq!(result.total, reference.total);
            assert_eq!(result.category_breakdown, reference.category_breakdown);
            assert_eq!(result.heaviest_stack, reference.heaviest_stack);
        }
    }
}
