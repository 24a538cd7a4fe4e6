pub mod ports;

pub use ports::{RecordSource, ReportSink};
