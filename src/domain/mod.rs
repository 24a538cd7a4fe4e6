use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::{ORDER_ID, UNKNOWN_ORDER_ID};
use crate::pipeline::utils::coerce_to_string;

/// An order exactly as received from the source.
///
/// Usually a JSON object, but nothing about it is trusted: fields may be
/// missing, null, wrongly typed, or carry currency symbols and unit suffixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a field. Absent fields and non-object records yield `None`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Like [`RawRecord::get`], but JSON null counts as absent.
    pub fn get_present(&self, field: &str) -> Option<&Value> {
        self.get(field).filter(|v| !v.is_null())
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The order_id as a display string, for diagnostics only.
    pub fn order_id_hint(&self) -> String {
        self.get_present(ORDER_ID)
            .map(|v| coerce_to_string(v).trim().to_string())
            .unwrap_or_else(|| UNKNOWN_ORDER_ID.to_string())
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A raw record that carries every required field with positive amounts.
///
/// Only the validator hands these out. The field values are still raw.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord(RawRecord);

impl ValidatedRecord {
    pub(crate) fn new(record: RawRecord) -> Self {
        Self(record)
    }

    pub fn raw(&self) -> &RawRecord {
        &self.0
    }

    pub fn into_raw(self) -> RawRecord {
        self.0
    }
}

/// Canonical payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Paid,
        PaymentStatus::Pending,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Exact match against the canonical spellings.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reports written by other tools may hold statuses we never emit; those
/// count as pending.
impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        Self::from_canonical(&s).unwrap_or(PaymentStatus::Pending)
    }
}

/// A fully normalized order with a recomputed total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub order_id: String,
    /// ISO-8601, or empty when the source timestamp could not be read
    pub timestamp: String,
    pub item: String,
    pub quantity: f64,
    pub price: f64,
    pub payment_status: PaymentStatus,
    /// Always `round(quantity * price, 2)`
    pub total: f64,
    /// Non-required source fields, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CleanRecord {
    /// Turn the record back into raw input, e.g. to feed it through the
    /// pipeline a second time.
    pub fn to_raw(&self) -> RawRecord {
        // Serializing plain data with string keys cannot fail
        RawRecord(serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

/// Per-status order counts; every canonical status is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub paid: usize,
    pub pending: usize,
    pub refunded: usize,
}

impl StatusCounts {
    pub fn increment(&mut self, status: PaymentStatus) {
        match status {
            PaymentStatus::Paid => self.paid += 1,
            PaymentStatus::Pending => self.pending += 1,
            PaymentStatus::Refunded => self.refunded += 1,
        }
    }

    pub fn get(&self, status: PaymentStatus) -> usize {
        match status {
            PaymentStatus::Paid => self.paid,
            PaymentStatus::Pending => self.pending,
            PaymentStatus::Refunded => self.refunded,
        }
    }

    pub fn sum(&self) -> usize {
        self.paid + self.pending + self.refunded
    }
}

/// Revenue and status statistics over a set of clean records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub total_orders: usize,
    pub status_counts: StatusCounts,
}

/// The document written by the report sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReport {
    pub analysis_summary: AnalysisSummary,
    pub cleaned_data: Vec<CleanRecord>,
}
