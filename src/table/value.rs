//! Cell values and the typed coercions the loaders apply to them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single cell in a [`Table`](super::Table).
///
/// CSV ingestion produces `Int`, `Float`, `Str` or `Null` by inference;
/// `Timestamp` and `Date` only appear after an explicit coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
}

/// Hashable projection of a [`Value`] usable as a join key.
///
/// Floats and nulls have no key; rows keyed on them never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Bool(bool),
    Int(i64),
    Str(String),
    Timestamp(i64),
    Date(NaiveDate),
}

impl Value {
    /// Infer a value from a raw CSV field.
    ///
    /// Empty fields become `Null`; integer and float literals are promoted,
    /// everything else stays a string.
    pub fn infer(field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(field.to_string())
    }

    /// Coerce this value to a timestamp, if it can represent one.
    ///
    /// Accepted forms: `Timestamp` (already coerced), strings in
    /// `%Y-%m-%d %H:%M:%S` or the `T`-separated variant (optional
    /// fractional seconds), and integers as epoch milliseconds.
    pub fn to_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Str(s) => parse_datetime(s),
            Value::Int(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc()),
            _ => None,
        }
    }

    /// Projection used by the join step; `None` means the row cannot match.
    pub fn join_key(&self) -> Option<JoinKey> {
        match self {
            Value::Null | Value::Float(_) => None,
            Value::Bool(b) => Some(JoinKey::Bool(*b)),
            Value::Int(i) => Some(JoinKey::Int(*i)),
            Value::Str(s) => Some(JoinKey::Str(s.clone())),
            Value::Timestamp(ts) => Some(JoinKey::Timestamp(ts.and_utc().timestamp_micros())),
            Value::Date(d) => Some(JoinKey::Date(*d)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable rendering used by error messages and CLI output.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Date(d) => d.to_string(),
        }
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    // Date-only strings need the explicit midnight expansion
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}
