//! Raw values as read from a tabular source, before any field policy is applied.

use chrono::NaiveDateTime;
use std::fmt;

/// A raw source cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// No underlying value.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Check whether the cell holds no value at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    /// Short name of the value kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Empty => "empty",
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "number",
            RawValue::String(_) => "text",
            RawValue::DateTime(_) => "datetime",
        }
    }

    /// Parse a header-like text cell, trimming surrounding whitespace.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Empty => None,
            other => {
                let text = other.to_string();
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// Booleans print as `True`/`False`, the form existing reports already carry.
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Empty => write!(f, ""),
            RawValue::Bool(true) => write!(f, "True"),
            RawValue::Bool(false) => write!(f, "False"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(fl) => write!(f, "{fl}"),
            RawValue::String(s) => write!(f, "{s}"),
            RawValue::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i64::from(i))
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        RawValue::DateTime(dt)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => RawValue::Empty,
        }
    }
}
