//! Comparison of converted records against expected canonical output.

use std::path::Path;

use anyhow::{Result, bail};

use crate::input::load_expected;
use crate::record::CanonicalRecord;

#[derive(Debug, Clone)]
pub struct GoldenCheck {
    expected: Vec<CanonicalRecord>,
}

impl GoldenCheck {
    pub fn new(expected: Vec<CanonicalRecord>) -> Result<Self> {
        if expected.is_empty() {
            bail!("expected output holds no records");
        }
        Ok(Self { expected })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::new(load_expected(path)?)
    }

    /// A single expected record applies to every output; otherwise outputs
    /// are matched by their position within the input file.
    pub fn expected_at(&self, index: usize) -> Option<&CanonicalRecord> {
        match self.expected.as_slice() {
            [only] => Some(only),
            many => many.get(index),
        }
    }

    /// Describes the first difference, or `None` when `actual` matches.
    pub fn check(&self, index: usize, actual: &CanonicalRecord) -> Option<String> {
        let Some(expected) = self.expected_at(index) else {
            return Some(format!("no expected record at position {index}"));
        };
        if expected == actual {
            return None;
        }
        let field = if expected.device_id != actual.device_id {
            "deviceID"
        } else if expected.device_type != actual.device_type {
            "deviceType"
        } else if expected.timestamp != actual.timestamp {
            "timestamp"
        } else if expected.location != actual.location {
            "location"
        } else {
            "data"
        };
        let render = |r: &CanonicalRecord| serde_json::to_string(r).unwrap_or_default();
        Some(format!(
            "{field} differs: expected {}, got {}",
            render(expected),
            render(actual)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(timestamp: i64) -> CanonicalRecord {
        serde_json::from_value(json!({
            "deviceID": "D1",
            "deviceType": "sensor",
            "timestamp": timestamp,
            "location": {"country": "a", "city": "b", "area": "c", "factory": "d", "section": "e"},
            "data": {"status": "OK"}
        }))
        .unwrap()
    }

    #[test]
    fn single_expected_record_applies_everywhere() {
        let golden = GoldenCheck::new(vec![record(1)]).unwrap();
        assert!(golden.check(0, &record(1)).is_none());
        assert!(golden.check(7, &record(1)).is_none());
    }

    #[test]
    fn reports_first_differing_field() {
        let golden = GoldenCheck::new(vec![record(1), record(2)]).unwrap();
        assert!(golden.check(1, &record(2)).is_none());
        let diff = golden.check(0, &record(2)).unwrap();
        assert!(diff.starts_with("timestamp differs"), "{diff}");
        assert!(golden.check(2, &record(1)).unwrap().contains("position 2"));
    }

    #[test]
    fn empty_expectation_is_rejected() {
        assert!(GoldenCheck::new(Vec::new()).is_err());
    }
}
