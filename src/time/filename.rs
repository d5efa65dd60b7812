//! Filename date parsing

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Eight consecutive digits, read as YYYYMMDD
static PATTERN_COMPACT_DATE: OnceLock<Regex> = OnceLock::new();

fn compact_date_pattern() -> &'static Regex {
    PATTERN_COMPACT_DATE.get_or_init(|| Regex::new(r"[0-9]{8}").unwrap())
}

/// Parse a capture date from the first 8-digit run of a file name
///
/// Only the first run is considered: when it is not a valid date the
/// name is treated as carrying no date at all.
pub fn parse_filename_date(filename: &str) -> Option<NaiveDate> {
    let found = compact_date_pattern().find(filename)?;
    let date = NaiveDate::parse_from_str(found.as_str(), "%Y%m%d").ok();
    trace!(filename, digits = found.as_str(), ?date, "Matched 8-digit run");
    date
}
