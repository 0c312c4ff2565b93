//! Converts telemetry records from two known JSON layouts into one
//! canonical record.
//!
//! ```
//! use serde_json::json;
//! use telenorm::{DetectionRule, normalize};
//!
//! let raw = json!({
//!     "deviceID": "D1",
//!     "deviceType": "sensor",
//!     "timestamp": 1700000000000i64,
//!     "location": "Japan/Tokyo/Area-1/Factory-2/Section-A",
//!     "operationStatus": "OK",
//!     "temp": 36.5
//! });
//! let record = normalize(&raw, DetectionRule::Truthy).unwrap();
//! assert_eq!(record.location.city, "Tokyo");
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod formats;
pub mod golden;
pub mod input;
pub mod normalizer;
pub mod output;
pub mod record;

pub use detect::{DetectionRule, RecordFormat, detect};
pub use error::{LocationParseError, NormalizeError, TimestampParseError};
pub use normalizer::{normalize, normalize_batch};
pub use record::{CanonicalRecord, FormatARecord, FormatBRecord, Location, RawRecord};
