use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::PaymentStatus;
use crate::pipeline::utils::as_number;

/// Leftmost unsigned decimal: digits, optionally followed by `.` and more digits
static DECIMAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("decimal pattern is valid"));

/// Read a number out of a loosely formatted amount.
///
/// JSON numbers are used as-is. Strings yield their leftmost unsigned decimal
/// (`"2pcs"` → 2, `"$15.99"` → 15.99, `"N2000"` → 2000). Anything else, or a
/// string without digits, yields `0.0`.
pub fn extract_decimal(value: &Value) -> f64 {
    if let Some(n) = as_number(value) {
        return n;
    }
    value
        .as_str()
        .and_then(|s| DECIMAL_PATTERN.find(s))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Map free-form payment status text onto a canonical status.
///
/// Non-strings are pending. Otherwise the trimmed, lowercased text is kept if
/// already canonical; text mentioning "paid" is paid, text mentioning
/// "refund" is refunded, and everything else is pending.
pub fn normalize_status(status: &Value) -> PaymentStatus {
    let Some(text) = status.as_str() else {
        return PaymentStatus::Pending;
    };

    let normalized = text.trim().to_lowercase();
    if let Some(canonical) = PaymentStatus::from_canonical(&normalized) {
        return canonical;
    }
    if normalized.contains("paid") {
        PaymentStatus::Paid
    } else if normalized.contains("refund") {
        PaymentStatus::Refunded
    } else {
        PaymentStatus::Pending
    }
}

/// Trim and sentence-case a text field; non-strings become empty.
pub fn clean_text(text: &Value) -> String {
    let Some(text) = text.as_str() else {
        return String::new();
    };

    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
