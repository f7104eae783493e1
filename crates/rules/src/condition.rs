//! Predicate evaluation for condition-gated triggers.
//!
//! Everything here is pure and total: a malformed condition or payload is a
//! non-match, never a panic or an error.

use serde_json::Value;

use trigon_core::{Condition, ConditionOp};

/// Evaluate a condition against an event payload.
///
/// `field` is looked up as a dotted path into the payload; a missing field
/// is a non-match for every operator. The ordering operators coerce both
/// operands to numbers and treat a failed coercion as non-match.
#[must_use]
pub fn matches(condition: &Condition, data: &Value) -> bool {
    let Some(actual) = lookup_path(data, &condition.field) else {
        return false;
    };

    match condition.op {
        ConditionOp::Equals => loose_eq(actual, &condition.value),
        ConditionOp::NotEquals => !loose_eq(actual, &condition.value),
        ConditionOp::GreaterThan => match (as_number(actual), as_number(&condition.value)) {
            (Some(lhs), Some(rhs)) => lhs > rhs,
            _ => false,
        },
        ConditionOp::LessThan => match (as_number(actual), as_number(&condition.value)) {
            (Some(lhs), Some(rhs)) => lhs < rhs,
            _ => false,
        },
        ConditionOp::Contains => contains(actual, &condition.value),
    }
}

/// Resolve a dotted path (`"client.budget"`) into a JSON payload.
fn lookup_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Numeric coercion: JSON numbers directly, strings via parse.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Equality with the coercions event payloads need in practice: exact JSON
/// equality, then numeric equality, then scalar-to-string comparison (so
/// `"150"` equals `150`).
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    if lhs == rhs {
        return true;
    }
    if let (Some(a), Some(b)) = (as_number(lhs), as_number(rhs)) {
        return (a - b).abs() < f64::EPSILON;
    }
    match (scalar_string(lhs), scalar_string(rhs)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Render scalars to their string form; compound values have none.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Substring test for strings, membership test for arrays.
fn contains(actual: &Value, needle: &Value) -> bool {
    match actual {
        Value::String(haystack) => {
            scalar_string(needle).is_some_and(|n| haystack.contains(&n))
        }
        Value::Array(items) => items.iter().any(|item| loose_eq(item, needle)),
        _ => false,
    }
}
