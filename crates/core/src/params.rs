//! Lenient extraction of typed configuration values from a JSON object.
//!
//! Settings arrive as loosely-typed JSON (CLI `--params`, config files). Each
//! helper returns the default when the key is missing or has the wrong type,
//! so a partial object never fails to load. Range checking is left to
//! [`FieldConfig::normalized`](crate::config::FieldConfig::normalized).

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Integers are accepted and widened to `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Floats are rejected rather than truncated; a pixel stride is a whole number.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}
