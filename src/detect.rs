//! Format classification for untyped records.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NormalizeError, Result};
use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    A,
    B,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::A => f.write_str("format A"),
            RecordFormat::B => f.write_str("format B"),
        }
    }
}

/// How a record's format is inferred from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionRule {
    /// A truthy `device` value means format B, anything else is format A.
    /// Never fails.
    #[default]
    Truthy,
    /// `device` object means format B, a `location` string without any
    /// `device` key means format A, everything else is rejected.
    Strict,
}

impl FromStr for DetectionRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "truthy" => Ok(DetectionRule::Truthy),
            "strict" => Ok(DetectionRule::Strict),
            _ => Err(format!("unknown detection rule: {s} (use 'truthy' or 'strict')")),
        }
    }
}

pub fn detect(raw: &Value, rule: DetectionRule) -> Result<RecordFormat> {
    let device = raw.get("device");
    match rule {
        DetectionRule::Truthy => {
            if device.is_some_and(is_truthy) {
                Ok(RecordFormat::B)
            } else {
                Ok(RecordFormat::A)
            }
        }
        DetectionRule::Strict => match device {
            Some(Value::Object(_)) => Ok(RecordFormat::B),
            None if raw.get("location").is_some_and(Value::is_string) => Ok(RecordFormat::A),
            _ => Err(NormalizeError::Unrecognized),
        },
    }
}

/// null, false, zero and empty containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl RawRecord {
    /// Classifies `raw` and deserializes it into the matching typed record.
    pub fn from_value(raw: &Value, rule: DetectionRule) -> Result<Self> {
        match detect(raw, rule)? {
            RecordFormat::A => typed(raw, RecordFormat::A).map(RawRecord::FormatA),
            RecordFormat::B => typed(raw, RecordFormat::B).map(RawRecord::FormatB),
        }
    }

    pub fn format(&self) -> RecordFormat {
        match self {
            RawRecord::FormatA(_) => RecordFormat::A,
            RawRecord::FormatB(_) => RecordFormat::B,
        }
    }
}

fn typed<T: DeserializeOwned>(raw: &Value, format: RecordFormat) -> Result<T> {
    T::deserialize(raw).map_err(|source| NormalizeError::Shape { format, source })
}
