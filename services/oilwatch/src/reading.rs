//! Buoy readings and response normalization
//!
//! The backend response shape is not guaranteed, so raw rows are handled as
//! `serde_json::Value` and coerced field by field into a [`BuoyView`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Readings at or above this value count as an oil detection
pub const OIL_READING_THRESHOLD: f64 = 1.0;

/// Render-ready view of a single buoy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuoyView {
    pub buoy_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub oil_detected: bool,
    pub reading: Option<f64>,
    pub last_updated: Option<String>,
}

/// Turn a `/readings-latest` response body into the view list.
///
/// Only the first row is used, so the result has at most one entry. A falsy
/// first row (`null`, `false`, `0` or `""`) counts as no row at all.
pub fn normalize_response(body: &Value) -> Vec<BuoyView> {
    let latest = body
        .get("rows")
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .filter(|row| !is_falsy(row));

    match latest {
        Some(row) => vec![normalize_row(row)],
        None => Vec::new(),
    }
}

/// Normalize one raw reading row
pub fn normalize_row(row: &Value) -> BuoyView {
    let sensor_data = row.get("sensor_data").filter(|v| v.is_object());
    let reading = sensor_data.and_then(|s| to_number(s.get("reading")));

    let oil_detected = is_true(row.get("oil_detected"))
        || is_true(sensor_data.and_then(|s| s.get("oil_detected")))
        || reading.is_some_and(|r| r >= OIL_READING_THRESHOLD);

    BuoyView {
        buoy_id: row.get("buoy_id").and_then(identifier),
        latitude: number_or_zero(row.get("latitude")),
        longitude: number_or_zero(row.get("longitude")),
        oil_detected,
        reading,
        last_updated: non_empty(row.get("created_at"))
            .or_else(|| non_empty(row.get("timestamp"))),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Strict boolean check: only a JSON `true` counts
fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Coerce a loosely-typed JSON value into a number.
///
/// `None` means "not a number". Missing fields and objects are never numbers;
/// `null`, empty strings and `false` are zero. Arrays coerce through their
/// comma-joined text, so `[]` is zero, `[x]` coerces like `x` as text and
/// anything longer is not a number.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_numeric_str(s)?,
        Value::Array(items) => array_to_number(items)?,
        Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn array_to_number(items: &[Value]) -> Option<f64> {
    match items {
        [] => Some(0.0),
        [Value::Null] => Some(0.0),
        [Value::Number(n)] => n.as_f64(),
        [Value::String(s)] => parse_numeric_str(s),
        [Value::Array(inner)] => array_to_number(inner),
        // booleans, objects and multi-element joins never parse
        _ => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust accepts "inf"/"nan" spellings that are not numbers on the wire
    if trimmed
        .trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_alphabetic())
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Coordinates fall back to zero for anything unusable
fn number_or_zero(value: Option<&Value>) -> f64 {
    to_number(value).filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
