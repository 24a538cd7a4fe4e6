use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::ports::{RecordSource, ReportSink};
use crate::domain::{OrderReport, RawRecord};
use crate::error::{PipelineError, Result};

/// Record source backed by a vector, for development and testing
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for InMemorySource {
    fn read_records(&self) -> Result<Vec<RawRecord>> {
        if self.records.is_empty() {
            return Err(PipelineError::EmptyInput("Source holds no records.".to_string()));
        }
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

/// Report sink that keeps every written report
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    reports: Arc<Mutex<Vec<OrderReport>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports written so far, oldest first
    pub fn reports(&self) -> Vec<OrderReport> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ReportSink for InMemorySink {
    fn write_report(&self, report: &OrderReport) -> Result<()> {
        let mut reports = self
            .reports
            .lock()
            .map_err(|e| PipelineError::Io(std::io::Error::other(e.to_string())))?;
        reports.push(report.clone());

        debug!("Stored report with {} orders", report.cleaned_data.len());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
