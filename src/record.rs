//! Raw and canonical telemetry record shapes.
//!
//! Field names on the wire are camelCase (`deviceID`, `operationStatus`, ...);
//! the Rust side uses snake_case and maps through `serde(rename)`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The unified record every input format is converted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "deviceType")]
    pub device_type: String,
    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub location: Location,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub city: String,
    pub area: String,
    pub factory: String,
    pub section: String,
}

impl Location {
    /// Components in wire order.
    pub fn parts(&self) -> [&str; 5] {
        [
            self.country.as_str(),
            self.city.as_str(),
            self.area.as_str(),
            self.factory.as_str(),
            self.section.as_str(),
        ]
    }
}

/// Flat record with a `/`-delimited location and a millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormatARecord {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "deviceType")]
    pub device_type: String,
    pub timestamp: i64,
    /// `country/city/area/factory/section`
    pub location: String,
    #[serde(rename = "operationStatus")]
    pub operation_status: String,
    pub temp: Number,
}

/// Nested-device record with an ISO-8601 timestamp and split location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormatBRecord {
    pub device: Device,
    /// `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    pub timestamp: String,
    #[serde(flatten)]
    pub location: Location,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A raw record whose format is already known.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    FormatA(FormatARecord),
    FormatB(FormatBRecord),
}
