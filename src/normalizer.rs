use serde_json::Value;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::detect::DetectionRule;
use crate::error::Result;
use crate::record::{CanonicalRecord, RawRecord};

/// Detects the format of `raw` and converts it to a canonical record.
pub fn normalize(raw: &Value, rule: DetectionRule) -> Result<CanonicalRecord> {
    RawRecord::from_value(raw, rule)?.into_canonical()
}

/// Converts every record independently. Output order mirrors input order.
pub fn normalize_batch(records: &[Value], rule: DetectionRule) -> Vec<Result<CanonicalRecord>> {
    #[cfg(feature = "parallel")]
    {
        records.par_iter().map(|raw| normalize(raw, rule)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        records.iter().map(|raw| normalize(raw, rule)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn format_a() -> Value {
        json!({
            "deviceID": "D1",
            "deviceType": "sensor",
            "timestamp": 1700000000000i64,
            "location": "Japan/Tokyo/Area-1/Factory-2/Section-A",
            "operationStatus": "OK",
            "temp": 36.5
        })
    }

    fn format_b() -> Value {
        json!({
            "device": {"id": "D1", "type": "sensor"},
            "timestamp": "2023-11-14T22:13:20.000000Z",
            "country": "Japan",
            "city": "Tokyo",
            "area": "Area-1",
            "factory": "Factory-2",
            "section": "Section-A",
            "data": {"status": "OK", "temperature": 36.5}
        })
    }

    #[test]
    fn both_formats_agree() {
        let a = normalize(&format_a(), DetectionRule::Truthy).unwrap();
        let b = normalize(&format_b(), DetectionRule::Truthy).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn strict_rule_still_converts_known_formats() {
        assert!(normalize(&format_a(), DetectionRule::Strict).is_ok());
        assert!(normalize(&format_b(), DetectionRule::Strict).is_ok());
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let mut broken = format_a();
        broken["location"] = json!("Japan/Tokyo");
        let records = vec![format_b(), broken, format_a()];

        let out = normalize_batch(&records, DetectionRule::Truthy);
        assert_eq!(out.len(), 3);
        assert!(out[0].is_ok());
        assert!(matches!(out[1], Err(NormalizeError::Location(_))));
        assert!(out[2].is_ok());
    }

    #[test]
    fn missing_field_is_a_shape_error() {
        let mut raw = format_b();
        raw.as_object_mut().unwrap().remove("section");
        let err = normalize(&raw, DetectionRule::Truthy).unwrap_err();
        assert!(err.to_string().contains("`section`"), "{err}");
    }
}
