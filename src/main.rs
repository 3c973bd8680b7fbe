//! Profile Bench CLI
//!
//! Compares aggregation throughput across three representations of the
//! same profiler data: denormalized per-sample stacks, normalized
//! index-referenced tables, and fully columnar tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use profile_bench::commands::{execute_bench, validate_args, BenchArgs, SelectorSetKind};
use profile_bench::profile::ProfileSize;
use profile_bench::utils::config::{DEFAULT_ITERATIONS, REPORT_VERSION};

/// Profile Bench - profiler representation shoot-out
#[derive(Parser, Debug)]
#[command(name = "profile-bench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the selection sweep and report throughput
    Bench {
        /// Selector set to exercise (omit to compare all of them)
        #[arg(short, long, value_enum)]
        set: Option<SelectorSetKind>,

        /// Synthetic profile size preset
        #[arg(long, value_enum, default_value = "small")]
        size: ProfileSize,

        /// Number of range selections to sweep
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,

        /// Selection width as a fraction of the base range
        #[arg(short, long, default_value_t = 0.25)]
        window: f64,

        /// PRNG seed for profile synthesis
        #[arg(long, default_value_t = 0x5eed_cafe)]
        seed: u64,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the available selector sets
    Sets,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Bench {
            set,
            size,
            iterations,
            window,
            seed,
            output,
        } => {
            let args = BenchArgs {
                selector_set: set,
                size,
                iterations,
                window_fraction: window,
                seed,
                output_json: output,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute bench
            execute_bench(args)?;
        }

        Commands::Sets => {
            display_selector_sets();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// List selector sets with one-line descriptions
///
/// **Private** - internal command implementation
fn display_selector_sets() {
    println!("Available selector sets:");
    for kind in SelectorSetKind::all() {
        let description = match kind {
            SelectorSetKind::Denormalized => "inline stacks, name-keyed aggregation",
            SelectorSetKind::Normalized => "stack table, name-keyed category map",
            SelectorSetKind::NormalizedIndexKeyed => "stack table, index-keyed category map",
            SelectorSetKind::NormalizedDense => "stack table, dense category/stack arrays",
            SelectorSetKind::Columnar => "parallel columns, per-sample table chase",
            SelectorSetKind::ColumnarStackCategories => {
                "parallel columns, memoized per-stack category column"
            }
            SelectorSetKind::ColumnarSampleCategories => {
                "parallel columns, memoized per-sample category column"
            }
            SelectorSetKind::ColumnarPacked => {
                "parallel columns, byte-packed per-sample category column"
            }
        };
        println!("  {:<28} {}", kind.label(), description);
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Profile Bench v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Benchmark harness for profiler data representations.");
}
