//! Row-to-record transformation: field normalization, risk and category
//! classification, and record assembly. Everything here is pure.

pub mod category;
pub mod normalize;
pub mod record;
pub mod risk;

use crate::error::Result;
use crate::types::{NormalizedRecord, RawRow};

pub use category::classify_category;
pub use normalize::{normalize_row, NormalizedFields};
pub use record::build_record;
pub use risk::classify_risk;

/// Normalize a row and build its record
pub fn process_row(row: &RawRow) -> Result<NormalizedRecord> {
    normalize_row(row).map(build_record)
}
