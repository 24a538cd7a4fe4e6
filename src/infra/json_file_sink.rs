use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::ReportSink;
use crate::constants::has_json_extension;
use crate::domain::OrderReport;
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Writes the report as a pretty-printed `.json` file (4-space indent)
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render a report exactly as it would be written to disk.
    pub fn render(report: &OrderReport) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        report
            .serialize(&mut serializer)
            .map_err(PipelineError::Serialization)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl ReportSink for JsonFileSink {
    fn write_report(&self, report: &OrderReport) -> Result<()> {
        let path_str = self.path.to_string_lossy();
        if !has_json_extension(&path_str) {
            return Err(PipelineError::BadFormat(format!(
                "Export file must be a .json file, got '{}'",
                path_str
            )));
        }

        let bytes = Self::render(report)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, &bytes)?;
        metrics::export::report_bytes(bytes.len());

        info!(path = %path_str, bytes = bytes.len(), "Successfully exported report");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisSummary, CleanRecord, PaymentStatus, StatusCounts};
    use serde_json::{Map, Value};
    use tempfile::tempdir;

    fn sample_report() -> OrderReport {
        OrderReport {
            analysis_summary: AnalysisSummary {
                total_revenue: 15.0,
                average_revenue: 15.0,
                total_orders: 1,
                status_counts: StatusCounts { paid: 1, pending: 0, refunded: 0 },
            },
            cleaned_data: vec![CleanRecord {
                order_id: "ORD010".to_string(),
                timestamp: "2025-10-19T08:45:00+00:00".to_string(),
                item: "Mouse pad".to_string(),
                quantity: 5.0,
                price: 3.0,
                payment_status: PaymentStatus::Paid,
                total: 15.0,
                extra: Map::new(),
            }],
        }
    }

    #[test]
    fn test_writes_report_with_two_top_level_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");

        JsonFileSink::new(&path).write_report(&sample_report()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["analysis_summary", "cleaned_data"]);
        assert_eq!(written["cleaned_data"][0]["total"], serde_json::json!(15.0));
    }

    #[test]
    fn test_output_uses_four_space_indent() {
        let text = String::from_utf8(JsonFileSink::render(&sample_report()).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"analysis_summary\": {\n        \"total_revenue\": 15.0,"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_wrong_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let err = JsonFileSink::new(&path).write_report(&sample_report()).unwrap_err();

        assert_eq!(err.kind(), "bad-format");
        assert!(err.to_string().contains("report.txt"));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be overwritten by a file
        let path = dir.path().join("taken.json");
        fs::create_dir(&path).unwrap();

        let err = JsonFileSink::new(&path).write_report(&sample_report()).unwrap_err();
        assert_eq!(err.kind(), "io-error");
    }
}
