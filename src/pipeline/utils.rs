use serde_json::Value;

/// String form of a loosely typed JSON value.
///
/// Strings come back verbatim, numbers in their JSON spelling (`2`, `15.99`),
/// booleans as `true`/`false`, null as the empty string, and arrays/objects
/// as compact JSON.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numeric JSON values as `f64`. Strings are not looked at.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Round to two decimal places.
///
/// Goes through the shortest-exact decimal formatting of the value, so
/// `round_to_cents(2.675)` is `2.67` (the stored double is just below the
/// midpoint) rather than the `2.68` that `(x * 100.0).round()` produces.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_to_string() {
        assert_eq!(coerce_to_string(&json!("  ORD001 ")), "  ORD001 ");
        assert_eq!(coerce_to_string(&json!(42)), "42");
        assert_eq!(coerce_to_string(&json!(0.0)), "0.0");
        assert_eq!(coerce_to_string(&json!(15.99)), "15.99");
        assert_eq!(coerce_to_string(&json!(true)), "true");
        assert_eq!(coerce_to_string(&json!(null)), "");
        assert_eq!(coerce_to_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!(-1.5)), Some(-1.5));
        assert_eq!(as_number(&json!("3")), None);
        assert_eq!(as_number(&json!(null)), None);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(31.98), 31.98);
        assert_eq!(round_to_cents(3.0 * 0.1), 0.3);
        assert_eq!(round_to_cents(2.675), 2.67);
        assert_eq!(round_to_cents(6044.4799999), 6044.48);
        assert_eq!(round_to_cents(0.0), 0.0);
        assert!(round_to_cents(f64::INFINITY).is_infinite());
    }
}
