// Pipeline processing: validation, transformation and analysis of order records

pub mod analyze;
pub mod transform;
pub mod validate;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The stage that produced a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validate,
    Transform,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Transform => "transform",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a single record was dropped
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("missing or empty required field 'item'")]
    EmptyItem,

    #[error("invalid or non-positive value for '{field}': {value}")]
    NotPositive { field: String, value: String },

    #[error("could not read a number from '{field}': {value}")]
    Unparseable { field: String, value: String },

    #[error("value for '{field}' is negative or not finite: {value}")]
    OutOfRange { field: String, value: String },
}

impl RejectionReason {
    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::NotAnObject => "not_an_object",
            RejectionReason::MissingField { .. } => "missing_field",
            RejectionReason::EmptyItem => "empty_item",
            RejectionReason::NotPositive { .. } => "not_positive",
            RejectionReason::Unparseable { .. } => "unparseable",
            RejectionReason::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Diagnostic for one dropped record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// Position of the record in the stage's input
    pub index: usize,
    pub order_id: String,
    pub stage: Stage,
    pub reason: RejectionReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping record #{} (order_id: {}) at {}: {}",
            self.index, self.order_id, self.stage, self.reason
        )
    }
}

/// What kind of non-fatal adjustment a notice reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The supplied total disagreed with quantity times price
    TotalCorrected,
    /// The timestamp matched no accepted layout and was blanked
    TimestampUnparsed,
}

/// Something worth mentioning about a record that was kept
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub order_id: String,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a stage kept, what it dropped, and anything worth mentioning
/// about the records it kept.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    pub accepted: Vec<T>,
    pub rejections: Vec<Rejection>,
    pub notices: Vec<Notice>,
}

impl<T> StageOutcome<T> {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
            rejections: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Number of records the stage looked at
    pub fn seen(&self) -> usize {
        self.accepted.len() + self.rejections.len()
    }
}

impl<T> Default for StageOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}
