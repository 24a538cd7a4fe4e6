//! Metrics for the order pipeline
//!
//! Every stage records through the small helper modules below so metric
//! names live in one place. Recording is a no-op until [`init`] installs
//! the Prometheus recorder, which keeps library callers and tests free of
//! global setup.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

use crate::error::{PipelineError, Result};

/// All metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Run
    RunsStarted,
    RunsCompleted,
    RunsFailed,
    RunDuration,
    StageDuration,

    // Read
    RecordsRead,
    InputBytes,

    // Validate
    ValidateRecordsAccepted,
    ValidateRecordsRejected,

    // Transform
    TransformRecordsAccepted,
    TransformRecordsRejected,
    TransformTotalsCorrected,
    TransformTimestampsUnparsed,

    // Analyze
    AnalyzeTotalRevenue,
    AnalyzeOrders,

    // Export
    ExportBytes,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RunsStarted => "order_pipeline_runs_started_total",
            MetricName::RunsCompleted => "order_pipeline_runs_completed_total",
            MetricName::RunsFailed => "order_pipeline_runs_failed_total",
            MetricName::RunDuration => "order_pipeline_run_duration_seconds",
            MetricName::StageDuration => "order_pipeline_stage_duration_seconds",

            MetricName::RecordsRead => "order_pipeline_records_read_total",
            MetricName::InputBytes => "order_pipeline_input_bytes",

            MetricName::ValidateRecordsAccepted => "order_pipeline_validate_records_accepted_total",
            MetricName::ValidateRecordsRejected => "order_pipeline_validate_records_rejected_total",

            MetricName::TransformRecordsAccepted => "order_pipeline_transform_records_accepted_total",
            MetricName::TransformRecordsRejected => "order_pipeline_transform_records_rejected_total",
            MetricName::TransformTotalsCorrected => "order_pipeline_transform_totals_corrected_total",
            MetricName::TransformTimestampsUnparsed => {
                "order_pipeline_transform_timestamps_unparsed_total"
            }

            MetricName::AnalyzeTotalRevenue => "order_pipeline_analyze_total_revenue",
            MetricName::AnalyzeOrders => "order_pipeline_analyze_orders",

            MetricName::ExportBytes => "order_pipeline_export_bytes",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RunsStarted,
            RunsCompleted,
            RunsFailed,
            RunDuration,
            StageDuration,
            RecordsRead,
            InputBytes,
            ValidateRecordsAccepted,
            ValidateRecordsRejected,
            TransformRecordsAccepted,
            TransformRecordsRejected,
            TransformTotalsCorrected,
            TransformTimestampsUnparsed,
            AnalyzeTotalRevenue,
            AnalyzeOrders,
            ExportBytes,
        ]
        .into_iter()
    }

    /// Returns (phase, description)
    pub fn metadata(&self) -> (&'static str, &'static str) {
        match self {
            MetricName::RunsStarted => ("run", "Pipeline runs started"),
            MetricName::RunsCompleted => ("run", "Pipeline runs that finished without error"),
            MetricName::RunsFailed => ("run", "Pipeline runs that ended in an error"),
            MetricName::RunDuration => ("run", "Wall-clock duration of a run in seconds"),
            MetricName::StageDuration => ("run", "Time spent in each processing stage in seconds"),
            MetricName::RecordsRead => ("read", "Raw records loaded from the source"),
            MetricName::InputBytes => ("read", "Size of the input document in bytes"),
            MetricName::ValidateRecordsAccepted => ("validate", "Records that passed validation"),
            MetricName::ValidateRecordsRejected => ("validate", "Records skipped by validation"),
            MetricName::TransformRecordsAccepted => ("transform", "Records cleaned successfully"),
            MetricName::TransformRecordsRejected => ("transform", "Records skipped by the transformer"),
            MetricName::TransformTotalsCorrected => ("transform", "Totals recomputed from quantity and price"),
            MetricName::TransformTimestampsUnparsed => ("transform", "Timestamps that matched no known format"),
            MetricName::AnalyzeTotalRevenue => ("analyze", "Revenue from paid orders in the last run"),
            MetricName::AnalyzeOrders => ("analyze", "Cleaned orders in the last run"),
            MetricName::ExportBytes => ("export", "Size of the written report in bytes"),
        }
    }

    fn is_gauge(&self) -> bool {
        matches!(self, MetricName::AnalyzeTotalRevenue | MetricName::AnalyzeOrders)
    }

    fn is_histogram(&self) -> bool {
        matches!(
            self,
            MetricName::RunDuration
                | MetricName::StageDuration
                | MetricName::InputBytes
                | MetricName::ExportBytes
        )
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it again is a no-op.
pub fn init() -> Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| PipelineError::Metrics(format!("Failed to install Prometheus recorder: {}", e)))?;

    for metric in MetricName::all_metrics() {
        let (_, description) = metric.metadata();
        let name = metric.as_str();
        if metric.is_gauge() {
            ::metrics::describe_gauge!(name, description);
        } else if metric.is_histogram() {
            ::metrics::describe_histogram!(name, description);
        } else {
            ::metrics::describe_counter!(name, description);
        }
    }

    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Current metrics in Prometheus text format, if the recorder is installed
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

/// Write the Prometheus text snapshot to `path`.
pub fn write_snapshot(path: &Path) -> Result<()> {
    let text = render()
        .ok_or_else(|| PipelineError::Metrics("Metrics recorder is not installed".to_string()))?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, text)?;
    info!(path = %path.display(), "Wrote metrics snapshot");
    Ok(())
}

// ============================================================================
// Run Metrics
// ============================================================================

pub mod run {
    use super::MetricName;

    pub fn started() {
        ::metrics::counter!(MetricName::RunsStarted.as_str()).increment(1);
    }

    pub fn completed(status: &'static str) {
        ::metrics::counter!(MetricName::RunsCompleted.as_str(), "status" => status).increment(1);
    }

    pub fn failed(kind: &'static str) {
        ::metrics::counter!(MetricName::RunsFailed.as_str(), "kind" => kind).increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(secs);
    }

    pub fn stage_duration(stage: &'static str, secs: f64) {
        ::metrics::histogram!(MetricName::StageDuration.as_str(), "stage" => stage).record(secs);
    }
}

// ============================================================================
// Read Metrics
// ============================================================================

pub mod read {
    use super::MetricName;

    pub fn records_read(count: usize) {
        ::metrics::counter!(MetricName::RecordsRead.as_str()).increment(count as u64);
    }

    pub fn input_bytes(bytes: usize) {
        ::metrics::histogram!(MetricName::InputBytes.as_str()).record(bytes as f64);
    }
}

// ============================================================================
// Validate Metrics
// ============================================================================

pub mod validate {
    use super::MetricName;

    pub fn records_accepted(count: usize) {
        ::metrics::counter!(MetricName::ValidateRecordsAccepted.as_str()).increment(count as u64);
    }

    pub fn record_rejected(reason: &'static str) {
        ::metrics::counter!(MetricName::ValidateRecordsRejected.as_str(), "reason" => reason)
            .increment(1);
    }
}

// ============================================================================
// Transform Metrics
// ============================================================================

pub mod transform {
    use super::MetricName;

    pub fn records_accepted(count: usize) {
        ::metrics::counter!(MetricName::TransformRecordsAccepted.as_str()).increment(count as u64);
    }

    pub fn record_rejected(reason: &'static str) {
        ::metrics::counter!(MetricName::TransformRecordsRejected.as_str(), "reason" => reason)
            .increment(1);
    }

    pub fn total_corrected() {
        ::metrics::counter!(MetricName::TransformTotalsCorrected.as_str()).increment(1);
    }

    pub fn timestamp_unparsed() {
        ::metrics::counter!(MetricName::TransformTimestampsUnparsed.as_str()).increment(1);
    }
}

// ============================================================================
// Analyze Metrics
// ============================================================================

pub mod analyze {
    use super::MetricName;

    pub fn summary(total_revenue: f64, total_orders: usize) {
        ::metrics::gauge!(MetricName::AnalyzeTotalRevenue.as_str()).set(total_revenue);
        ::metrics::gauge!(MetricName::AnalyzeOrders.as_str()).set(total_orders as f64);
    }
}

// ============================================================================
// Export Metrics
// ============================================================================

pub mod export {
    use super::MetricName;

    pub fn report_bytes(bytes: usize) {
        ::metrics::histogram!(MetricName::ExportBytes.as_str()).record(bytes as f64);
    }
}
