use crate::domain::{OrderReport, RawRecord};
use crate::error::Result;

/// Where raw order records come from
pub trait RecordSource {
    /// Load the whole batch. Problems with the batch as a whole (missing
    /// file, malformed document, no records) are errors; problems with
    /// individual records are left for the validator.
    fn read_records(&self) -> Result<Vec<RawRecord>>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Where the finished report goes
pub trait ReportSink {
    fn write_report(&self, report: &OrderReport) -> Result<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}
