pub mod format_a;
pub mod format_b;

use crate::error::Result;
use crate::record::{CanonicalRecord, RawRecord};

impl RawRecord {
    pub fn into_canonical(self) -> Result<CanonicalRecord> {
        match self {
            RawRecord::FormatA(rec) => format_a::convert(rec),
            RawRecord::FormatB(rec) => format_b::convert(rec),
        }
    }
}
