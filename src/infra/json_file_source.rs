use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::ports::RecordSource;
use crate::constants::has_json_extension;
use crate::domain::{OrderReport, RawRecord};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Reads a batch of orders from a `.json` file holding a top-level array
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an in-memory document with the same rules as a file.
    pub fn parse_document(bytes: &[u8]) -> Result<Vec<RawRecord>> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyInput("File is empty.".to_string()));
        }

        let document: Value = serde_json::from_slice(bytes).map_err(PipelineError::Decode)?;
        let Value::Array(items) = document else {
            return Err(PipelineError::BadFormat(
                "JSON content is not a list of records.".to_string(),
            ));
        };
        if items.is_empty() {
            return Err(PipelineError::EmptyInput("File contains an empty list.".to_string()));
        }

        Ok(items.into_iter().map(RawRecord::new).collect())
    }
}

/// Load a previously exported report, e.g. to analyze it again.
pub fn read_report(path: &Path) -> Result<OrderReport> {
    let path_str = path.to_string_lossy();
    if !has_json_extension(&path_str) {
        return Err(PipelineError::BadFormat(format!(
            "Only .json files are accepted, got '{}'",
            path_str
        )));
    }

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PipelineError::NotFound(path.to_path_buf()),
        _ => PipelineError::Io(e),
    })?;
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput("File is empty.".to_string()));
    }

    let report: OrderReport = serde_json::from_slice(&bytes).map_err(PipelineError::Decode)?;
    debug!("Loaded report with {} orders from {}", report.cleaned_data.len(), path_str);
    Ok(report)
}

impl RecordSource for JsonFileSource {
    fn read_records(&self) -> Result<Vec<RawRecord>> {
        let path_str = self.path.to_string_lossy();
        if !has_json_extension(&path_str) {
            return Err(PipelineError::BadFormat(format!(
                "Only .json files are accepted, got '{}'",
                path_str
            )));
        }

        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PipelineError::NotFound(self.path.clone()),
            _ => PipelineError::Io(e),
        })?;

        let digest = hex::encode(Sha256::digest(&bytes));
        info!(path = %path_str, bytes = bytes.len(), sha256 = %digest, "Read input file");
        metrics::read::input_bytes(bytes.len());

        let records = Self::parse_document(&bytes)?;
        debug!("Loaded {} raw records from {}", records.len(), path_str);
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_array_of_records() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "orders.json", r#"[{"order_id": "ORD001"}, {"order_id": 2}]"#);

        let records = JsonFileSource::new(&path).read_records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_id_hint(), "ORD001");
        assert_eq!(records[1].order_id_hint(), "2");
    }

    #[test]
    fn test_wrong_extension_is_bad_format() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "orders.csv", "[]");
        let err = JsonFileSource::new(&path).read_records().unwrap_err();
        assert_eq!(err.kind(), "bad-format");
        assert!(err.to_string().contains("orders.csv"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("absent.json"))
            .read_records()
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[test]
    fn test_empty_file_and_empty_list() {
        let dir = tempdir().unwrap();

        let empty_file = write(dir.path(), "empty.json", "");
        let err = JsonFileSource::new(&empty_file).read_records().unwrap_err();
        assert_eq!(err.kind(), "empty-input");

        let empty_list = write(dir.path(), "empty_list.json", "[]");
        let err = JsonFileSource::new(&empty_list).read_records().unwrap_err();
        assert_eq!(err.kind(), "empty-input");
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "broken.json", r#"[{"order_id": "ORD001",]"#);
        let err = JsonFileSource::new(&path).read_records().unwrap_err();
        assert_eq!(err.kind(), "decode-error");
    }

    #[test]
    fn test_non_array_document_is_bad_format() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "object.json", r#"{"order_id": "ORD001"}"#);
        let err = JsonFileSource::new(&path).read_records().unwrap_err();
        assert_eq!(err.kind(), "bad-format");
    }

    #[test]
    fn test_read_report_folds_unknown_status() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "report.json",
            r#"{
                "analysis_summary": {"total_revenue": 0.0, "average_revenue": 0.0,
                    "total_orders": 1, "status_counts": {"paid": 0, "pending": 1, "refunded": 0}},
                "cleaned_data": [{"order_id": "A", "timestamp": "", "item": "X",
                    "quantity": 1.0, "price": 2.0, "payment_status": "shipped", "total": 2.0,
                    "gift_wrap": true}]
            }"#,
        );

        let report = read_report(&path).unwrap();

        assert_eq!(report.cleaned_data[0].payment_status.as_str(), "pending");
        assert_eq!(report.cleaned_data[0].extra["gift_wrap"], serde_json::json!(true));
    }

    #[test]
    fn test_read_report_rejects_record_arrays() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "orders.json", r#"[{"order_id": "A"}]"#);
        let err = read_report(&path).unwrap_err();
        assert_eq!(err.kind(), "decode-error");
    }

    #[test]
    fn test_non_object_elements_are_kept_for_the_validator() {
        let records = JsonFileSource::parse_document(br#"[1, {"order_id": "A"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].is_object());
    }
}
