//! Deterministic text processing for the HR conversation engine
//!
//! These primitives back the non-model layers of the extractor:
//! - keyword-based intent prefilter (config-driven, ordered table)
//! - time-range parsing with 12-hour to 24-hour conversion
//! - date resolution, including dates given without a year
//! - salary-period phrases ("last month", month names)
//! - fuzzy matching of leave-type mentions against reference data

pub mod dates;
pub mod fuzzy;
pub mod intent;
pub mod time;

pub use dates::{resolve_date, resolve_past_date, resolve_salary_period};
pub use fuzzy::match_leave_type;
pub use intent::KeywordIntentDetector;
pub use time::parse_time_range;
