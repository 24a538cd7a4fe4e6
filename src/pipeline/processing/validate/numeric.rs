//! Positive-amount predicates used by the validator.
//!
//! Two readings of "this looks like a positive amount" exist for the same
//! messy strings. They disagree on inputs like `"2pcs"` or `"45 dollars"`, so
//! each one is a separate function and the validator picks one through
//! [`NumericPolicy`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::constants::CURRENCY_PREFIX_CHARS;
use crate::pipeline::utils::as_number;

/// Which positive-amount predicate the validator applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Accept a bare number, optionally behind a `$`/`N` currency marker
    #[default]
    CurrencyPrefix,
    /// Drop every character that is not a digit or `.`, then parse the rest
    StripNonDigits,
}

impl NumericPolicy {
    pub fn is_positive(&self, value: &Value) -> bool {
        match self {
            NumericPolicy::CurrencyPrefix => is_positive_prefixed(value),
            NumericPolicy::StripNonDigits => is_positive_stripped(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericPolicy::CurrencyPrefix => "currency_prefix",
            NumericPolicy::StripNonDigits => "strip_non_digits",
        }
    }
}

impl fmt::Display for NumericPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NumericPolicy {
    type Err = String;

    /// Accepts both `snake_case` and `kebab-case` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "currency_prefix" => Ok(NumericPolicy::CurrencyPrefix),
            "strip_non_digits" => Ok(NumericPolicy::StripNonDigits),
            other => Err(format!(
                "unknown numeric policy '{}' (expected currency_prefix or strip_non_digits)",
                other
            )),
        }
    }
}

/// Bare numbers, optionally prefixed by currency markers.
///
/// 1. JSON numbers: positive iff `> 0`.
/// 2. Anything else that is not a string: false.
/// 3. The trimmed string parses as a float: positive iff `> 0`.
/// 4. Otherwise drop leading `$`, `N`, `n`, trim, and parse again.
///
/// `"$15.99"` and `"N2000"` pass; `"2pcs"`, `"5usd"`, `"N/A"` and
/// `"45 dollars"` do not.
pub fn is_positive_prefixed(value: &Value) -> bool {
    if let Some(n) = as_number(value) {
        return n > 0.0;
    }
    let Some(s) = value.as_str() else {
        return false;
    };

    if let Ok(n) = s.trim().parse::<f64>() {
        return n > 0.0;
    }

    s.trim()
        .trim_start_matches(|c: char| CURRENCY_PREFIX_CHARS.contains(&c))
        .trim()
        .parse::<f64>()
        .map(|n| n > 0.0)
        .unwrap_or(false)
}

/// Digits and dots only.
///
/// 1. JSON numbers: positive iff `> 0`.
/// 2. Anything else that is not a string: false.
/// 3. Every character other than an ASCII digit or `.` is removed, so
///    disjoint digit groups are concatenated (`"12-34"` reads as `1234`).
/// 4. An empty or unparseable residue, or one `<= 0`, is false.
pub fn is_positive_stripped(value: &Value) -> bool {
    if let Some(n) = as_number(value) {
        return n > 0.0;
    }
    let Some(s) = value.as_str() else {
        return false;
    };

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return false;
    }
    cleaned.parse::<f64>().map(|n| n > 0.0).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefixed_accepts_currency_markers() {
        assert!(is_positive_prefixed(&json!("$15.99")));
        assert!(is_positive_prefixed(&json!("N2000")));
        assert!(is_positive_prefixed(&json!("n450")));
        assert!(is_positive_prefixed(&json!(" $ 12 ")));
        assert!(is_positive_prefixed(&json!("12.50")));
        assert!(is_positive_prefixed(&json!(2)));
        assert!(is_positive_prefixed(&json!(0.5)));
    }

    #[test]
    fn test_prefixed_rejects_suffixes_and_non_positive() {
        assert!(!is_positive_prefixed(&json!("2pcs")));
        assert!(!is_positive_prefixed(&json!("5usd")));
        assert!(!is_positive_prefixed(&json!("N/A")));
        assert!(!is_positive_prefixed(&json!("45 dollars")));
        assert!(!is_positive_prefixed(&json!(-3)));
        assert!(!is_positive_prefixed(&json!(0)));
        assert!(!is_positive_prefixed(&json!("0")));
        assert!(!is_positive_prefixed(&json!("$-5")));
        assert!(!is_positive_prefixed(&json!("nan")));
        assert!(!is_positive_prefixed(&json!("")));
        assert!(!is_positive_prefixed(&json!(null)));
        assert!(!is_positive_prefixed(&json!(true)));
        assert!(!is_positive_prefixed(&json!([1])));
    }

    #[test]
    fn test_stripped_accepts_any_digit_residue() {
        assert!(is_positive_stripped(&json!("$15.99")));
        assert!(is_positive_stripped(&json!("N2000")));
        assert!(is_positive_stripped(&json!("2pcs")));
        assert!(is_positive_stripped(&json!("5usd")));
        assert!(is_positive_stripped(&json!("45 dollars")));
        assert!(is_positive_stripped(&json!("12-34")));
        assert!(is_positive_stripped(&json!(7)));
    }

    #[test]
    fn test_stripped_rejects_empty_or_bad_residue() {
        assert!(!is_positive_stripped(&json!("N/A")));
        assert!(!is_positive_stripped(&json!("free")));
        assert!(!is_positive_stripped(&json!("0.00")));
        assert!(!is_positive_stripped(&json!("1.2.3")));
        assert!(!is_positive_stripped(&json!(".")));
        assert!(!is_positive_stripped(&json!(-3)));
        assert!(!is_positive_stripped(&json!(0)));
        assert!(!is_positive_stripped(&json!(null)));
    }

    #[test]
    fn test_stripped_ignores_minus_sign() {
        // The sign is stripped along with everything else
        assert!(is_positive_stripped(&json!("-3")));
        assert!(!is_positive_prefixed(&json!("-3")));
    }

    #[test]
    fn test_policy_dispatch_and_parsing() {
        let pcs = json!("2pcs");
        assert!(!NumericPolicy::CurrencyPrefix.is_positive(&pcs));
        assert!(NumericPolicy::StripNonDigits.is_positive(&pcs));

        assert_eq!(NumericPolicy::default(), NumericPolicy::CurrencyPrefix);
        assert_eq!("strip-non-digits".parse::<NumericPolicy>(), Ok(NumericPolicy::StripNonDigits));
        assert_eq!("currency_prefix".parse::<NumericPolicy>(), Ok(NumericPolicy::CurrencyPrefix));
        assert!("lenient".parse::<NumericPolicy>().is_err());
    }
}
