//! Value comparison with numeric coercion.
//!
//! Numbers compare numerically regardless of representation: `2`, `2.0`
//! and the string `"2"` are all equal to an expected `2`. Coercion only
//! applies when the expected side is a number.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Returns true if `actual` matches `expected`.
#[must_use]
pub fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), _) => as_number(actual)
            .is_some_and(|a| compare_numbers(e, &a) == Some(Ordering::Equal)),
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| values_equal(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, e)| a.get(key).is_some_and(|a| values_equal(e, a)))
        }
        _ => expected == actual,
    }
}

/// Orders `actual` relative to `expected`.
///
/// Defined for numbers (with the same coercion as [`values_equal`]) and for
/// string pairs; `None` for anything else.
#[must_use]
pub fn compare_values(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::String(a), Value::String(e)) => Some(a.as_str().cmp(e)),
        (_, Value::Number(e)) => compare_numbers(&as_number(actual)?, e),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return Some(a.cmp(&b));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}
