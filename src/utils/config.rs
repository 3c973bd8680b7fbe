//! Configuration and constants for the benchmark harness.

/// Number of buckets in the call-depth density graph.
pub const GRAPH_BUCKET_COUNT: usize = 800;

/// Number of throughput samples retained by the sliding-window accumulator.
pub const THROUGHPUT_WINDOW: usize = 10;

/// Current bench report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Default number of range selections per bench run
pub const DEFAULT_ITERATIONS: usize = 200;

// Sample counts for the synthetic profile size presets
pub const SMALL_SAMPLE_COUNT: usize = 10_000;
pub const MEDIUM_SAMPLE_COUNT: usize = 100_000;
pub const LARGE_SAMPLE_COUNT: usize = 1_000_000;
