//! JSON bench report writer.
//!
//! Writes BenchReport structs to JSON files with proper formatting.
//! The report schema is versioned to allow future evolution.

use crate::utils::config::REPORT_VERSION;
use crate::utils::error::ReportError;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level bench report written to JSON
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchReport {
    /// Report schema version for compatibility checking
    pub version: String,

    /// Profile size preset the run used
    pub profile_size: String,

    /// Number of range selections per selector set
    pub iterations: usize,

    /// One entry per selector set exercised
    pub results: Vec<ScenarioResult>,

    /// RFC 3339 timestamp when the report was generated
    pub generated_at: String,
}

impl BenchReport {
    pub fn new(profile_size: String, iterations: usize, results: Vec<ScenarioResult>) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            profile_size,
            iterations,
            results,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Aggregates and throughput figures from one selector-set run.
///
/// Holds the final selection's aggregates (every iteration produces the
/// same logical numbers for the same window; the last one is as good as
/// any) plus the smoothed throughput after all iterations. A throughput
/// accumulator that never recorded a sample serializes its NaN average
/// as JSON null.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScenarioResult {
    /// Selector-set label, e.g. "columnar-sample-categories"
    pub selector_set: String,

    pub overall_sample_count: usize,
    pub selected_sample_count: usize,
    pub total: f64,

    /// Ordered for stable report diffs
    pub category_breakdown: BTreeMap<String, f64>,

    /// Leaf-to-root frame names of the heaviest stack
    pub heaviest_stack: Vec<String>,

    /// NaN serializes as JSON `null` and reads back as NaN
    #[serde(deserialize_with = "nan_from_null")]
    pub category_breakdown_throughput_ns: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub heaviest_stack_throughput_ns: f64,
}

/// serde_json writes non-finite floats as `null`; map those back to NaN
/// on the way in so every written report can be re-loaded.
fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Write a bench report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `ReportError::WriteFailed` - I/O error during write
/// * `ReportError::SerializationFailed` - JSON serialization error
/// * `ReportError::InvalidPath` - path is empty, a directory, or cannot be created
pub fn write_report(report: &BenchReport, output_path: impl AsRef<Path>) -> Result<(), ReportError> {
    let output_path = output_path.as_ref();

    info!("Writing bench report to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                ReportError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(ReportError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(ReportError::SerializationFailed)?;

    Ok(())
}

/// Read a bench report back from a JSON file
///
/// **Public** - useful for comparing runs and for testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<BenchReport, ReportError> {
    let input_path = input_path.as_ref();

    debug!("Reading bench report from: {}", input_path.display());

    let file = File::open(input_path).map_err(ReportError::ReadFailed)?;
    let report: BenchReport = serde_json::from_reader(file).map_err(ReportError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} result(s)",
        report.version,
        report.results.len()
    );

    Ok(report)
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), ReportError> {
    if path.as_os_str().is_empty() {
        return Err(ReportError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(ReportError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
