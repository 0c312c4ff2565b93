use serde_json::{Map, Value};

use crate::error::{LocationParseError, Result};
use crate::record::{CanonicalRecord, FormatARecord, Location};

pub const LOCATION_SEPARATOR: char = '/';
const LOCATION_SEGMENTS: usize = 5;

pub fn convert(rec: FormatARecord) -> Result<CanonicalRecord> {
    let location = parse_location(&rec.location)?;

    let mut data = Map::with_capacity(2);
    data.insert("status".to_string(), Value::String(rec.operation_status));
    data.insert("temperature".to_string(), Value::Number(rec.temp));

    Ok(CanonicalRecord {
        device_id: rec.device_id,
        device_type: rec.device_type,
        timestamp: rec.timestamp,
        location,
        data,
    })
}

/// Splits `country/city/area/factory/section` positionally.
///
/// Segments are taken as-is: no trimming, empty segments allowed. Anything
/// past the fifth segment is ignored.
pub fn parse_location(raw: &str) -> std::result::Result<Location, LocationParseError> {
    let segments: Vec<&str> = raw.split(LOCATION_SEPARATOR).collect();
    let &[country, city, area, factory, section, ..] = segments.as_slice() else {
        return Err(LocationParseError {
            expected: LOCATION_SEGMENTS,
            got: segments.len(),
            raw: raw.to_string(),
        });
    };
    Ok(Location {
        country: country.to_string(),
        city: city.to_string(),
        area: area.to_string(),
        factory: factory.to_string(),
        section: section.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample(location: &str) -> FormatARecord {
        serde_json::from_value(json!({
            "deviceID": "D1",
            "deviceType": "sensor",
            "timestamp": 1700000000000i64,
            "location": location,
            "operationStatus": "OK",
            "temp": 36.5
        }))
        .unwrap()
    }

    #[test]
    fn renames_status_and_temp() {
        let out = convert(sample("Japan/Tokyo/Area-1/Factory-2/Section-A")).unwrap();
        assert_eq!(out.timestamp, 1700000000000);
        assert_eq!(Value::Object(out.data), json!({"status": "OK", "temperature": 36.5}));
        assert_eq!(out.location.section, "Section-A");
    }

    #[test]
    fn short_location_fails() {
        match convert(sample("Japan/Tokyo/Area-1")) {
            Err(NormalizeError::Location(err)) => {
                assert_eq!(err.expected, 5);
                assert_eq!(err.got, 3);
                assert_eq!(err.raw, "Japan/Tokyo/Area-1");
            }
            other => panic!("expected location error, got {other:?}"),
        }
    }

    #[test]
    fn segments_are_not_trimmed() {
        let loc = parse_location(" Japan/Tokyo //Factory-2/Section-A").unwrap();
        assert_eq!(loc.country, " Japan");
        assert_eq!(loc.city, "Tokyo ");
        assert_eq!(loc.area, "");
    }

    #[test]
    fn extra_segments_are_ignored() {
        let loc = parse_location("a/b/c/d/e/f").unwrap();
        assert_eq!(loc.section, "e");
    }

    #[test]
    fn empty_string_is_one_segment() {
        assert_eq!(parse_location("").unwrap_err().got, 1);
    }

    proptest! {
        #[test]
        fn split_then_join_reproduces_input(parts in prop::array::uniform5("[^/]{1,12}")) {
            let raw = parts.join("/");
            let loc = parse_location(&raw).unwrap();
            prop_assert_eq!(loc.parts().join("/"), raw);
        }
    }
}
