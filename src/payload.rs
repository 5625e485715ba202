//! Field accessors for loosely shaped upstream documents
//!
//! DexScreener payloads are treated as untyped `serde_json::Value` trees. The
//! helpers here walk and coerce them without ever failing: anything that is
//! missing or has the wrong shape comes back as `None`.

use serde_json::Value;

/// Walk `keys` through nested objects.
///
/// Returns `None` as soon as an intermediate value is not an object or a key
/// is absent. An explicit `null` leaf is returned as `Some(&Value::Null)`.
pub fn get_nested<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Like [`get_nested`], falling back to `default` when the path does not resolve
pub fn get_nested_or<'a>(value: &'a Value, keys: &[&str], default: &'a Value) -> &'a Value {
    get_nested(value, keys).unwrap_or(default)
}

/// Coerce a value to a finite `f64`.
///
/// Numbers pass through, numeric strings are parsed (surrounding whitespace is
/// ignored) and booleans map to 0/1. NaN and infinities are rejected.
pub fn to_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

/// Coerce a value to an `i64`.
///
/// Integral numbers pass through and finite floats truncate toward zero.
/// Strings must hold an integer literal; `"3.5"` does not coerce.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            let truncated = f.trunc();
            (f.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64)
                .then_some(truncated as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Non-empty string content, if the value is a string
pub fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Loose truthiness used for "first present value wins" fallbacks.
///
/// `null`, `false`, zero, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// `primary` when it is truthy, otherwise `fallback` as-is (which may be falsy too)
pub fn truthy_or<'a>(primary: Option<&'a Value>, fallback: Option<&'a Value>) -> Option<&'a Value> {
    primary.filter(|v| is_truthy(v)).or(fallback)
}
