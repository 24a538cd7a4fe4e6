use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::app::ports::{RecordSource, ReportSink};
use crate::domain::{AnalysisSummary, OrderReport, RawRecord};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::analyze::analyze;
use crate::pipeline::processing::transform::Transformer;
use crate::pipeline::processing::validate::{NumericPolicy, Validator};
use crate::pipeline::processing::{Notice, NoticeKind, Rejection, Stage};

/// Knobs for a pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub numeric_policy: NumericPolicy,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Report produced
    Completed,
    /// Every record failed validation; nothing was written
    NoValidRecords,
    /// Every validated record failed transformation; nothing was written
    NoTransformedRecords,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::NoValidRecords => "no_valid_records",
            RunStatus::NoTransformedRecords => "no_transformed_records",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running the in-memory stages over one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBatch {
    pub status: RunStatus,
    pub total_records: usize,
    pub validated_records: usize,
    pub transformed_records: usize,
    /// Validation rejections first, then transform rejections. Transform
    /// rejections index into the validated subset.
    pub rejections: Vec<Rejection>,
    pub notices: Vec<Notice>,
    /// Present only when `status` is [`RunStatus::Completed`]
    pub report: Option<OrderReport>,
}

impl ProcessedBatch {
    pub fn summary(&self) -> Option<&AnalysisSummary> {
        self.report.as_ref().map(|r| &r.analysis_summary)
    }
}

/// What a full run did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub total_records: usize,
    pub validated_records: usize,
    pub transformed_records: usize,
    pub rejections: Vec<Rejection>,
    pub notices: Vec<Notice>,
    pub summary: Option<AnalysisSummary>,
    /// Where the report went, when one was written
    pub output: Option<String>,
}

/// Validate, transform and analyze a batch without touching any I/O.
pub fn process_batch(records: &[RawRecord], options: &PipelineOptions) -> ProcessedBatch {
    let validator = Validator::with_policy(options.numeric_policy);
    let transformer = Transformer::new();

    let started = Instant::now();
    let validated = validator.validate(records);
    metrics::run::stage_duration(Stage::Validate.as_str(), started.elapsed().as_secs_f64());

    metrics::validate::records_accepted(validated.accepted.len());
    for rejection in &validated.rejections {
        warn!("{}", rejection);
        metrics::validate::record_rejected(rejection.reason.label());
    }
    info!(
        "Validation complete: {} valid records out of {}",
        validated.accepted.len(),
        records.len()
    );

    let mut batch = ProcessedBatch {
        status: RunStatus::NoValidRecords,
        total_records: records.len(),
        validated_records: validated.accepted.len(),
        transformed_records: 0,
        rejections: validated.rejections,
        notices: Vec::new(),
        report: None,
    };

    if validated.accepted.is_empty() {
        warn!("No valid records to process. Stopping pipeline.");
        return batch;
    }

    let started = Instant::now();
    let transformed = transformer.transform(&validated.accepted);
    metrics::run::stage_duration(Stage::Transform.as_str(), started.elapsed().as_secs_f64());

    metrics::transform::records_accepted(transformed.accepted.len());
    for rejection in &transformed.rejections {
        warn!("{}", rejection);
        metrics::transform::record_rejected(rejection.reason.label());
    }
    for notice in &transformed.notices {
        debug!("{}", notice);
        match notice.kind {
            NoticeKind::TotalCorrected => metrics::transform::total_corrected(),
            NoticeKind::TimestampUnparsed => metrics::transform::timestamp_unparsed(),
        }
    }
    info!(
        "Transformation complete: {} records cleaned out of {}",
        transformed.accepted.len(),
        validated.accepted.len()
    );

    batch.transformed_records = transformed.accepted.len();
    batch.rejections.extend(transformed.rejections);
    batch.notices = transformed.notices;

    if transformed.accepted.is_empty() {
        warn!("Transformation resulted in no data. Stopping pipeline.");
        batch.status = RunStatus::NoTransformedRecords;
        return batch;
    }

    let summary = analyze(&transformed.accepted);
    metrics::analyze::summary(summary.total_revenue, summary.total_orders);
    info!(
        total_revenue = summary.total_revenue,
        total_orders = summary.total_orders,
        paid = summary.status_counts.paid,
        pending = summary.status_counts.pending,
        refunded = summary.status_counts.refunded,
        "Analysis complete"
    );

    batch.status = RunStatus::Completed;
    batch.report = Some(OrderReport {
        analysis_summary: summary,
        cleaned_data: transformed.accepted,
    });
    batch
}

/// Read, process and export one batch of orders
pub struct OrderPipeline<S, K> {
    source: S,
    sink: K,
    options: PipelineOptions,
}

impl<S: RecordSource, K: ReportSink> OrderPipeline<S, K> {
    pub fn new(source: S, sink: K, options: PipelineOptions) -> Self {
        Self {
            source,
            sink,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run the stages over records that are already in memory.
    pub fn process(&self, records: &[RawRecord]) -> ProcessedBatch {
        process_batch(records, &self.options)
    }

    /// Run the whole pipeline once.
    ///
    /// Problems with the batch as a whole (unreadable input, unwritable
    /// output) are errors. A batch with nothing left after validation or
    /// transformation ends early with a non-`Completed` status and writes
    /// nothing.
    pub fn run(&self) -> Result<PipelineReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id);
        let _enter = span.enter();

        let started = Instant::now();
        metrics::run::started();
        info!(
            source = %self.source.describe(),
            sink = %self.sink.describe(),
            numeric_policy = %self.options.numeric_policy,
            "Starting pipeline run"
        );

        let result = self.run_stages(run_id);
        metrics::run::duration(started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                metrics::run::completed(report.status.as_str());
                info!(status = %report.status, "Pipeline run finished");
            }
            Err(e) => {
                metrics::run::failed(e.kind());
                warn!(kind = e.kind(), "Pipeline run failed: {}", e);
            }
        }
        result
    }

    fn run_stages(&self, run_id: Uuid) -> Result<PipelineReport> {
        let records = self.source.read_records()?;
        metrics::read::records_read(records.len());
        info!("Loaded {} records from {}", records.len(), self.source.describe());

        let batch = self.process(&records);

        let output = match &batch.report {
            Some(report) => {
                self.sink.write_report(report)?;
                info!("Exported report to {}", self.sink.describe());
                Some(self.sink.describe())
            }
            None => None,
        };

        Ok(PipelineReport {
            run_id,
            status: batch.status,
            total_records: batch.total_records,
            validated_records: batch.validated_records,
            transformed_records: batch.transformed_records,
            summary: batch.summary().cloned(),
            rejections: batch.rejections,
            notices: batch.notices,
            output,
        })
    }
}
