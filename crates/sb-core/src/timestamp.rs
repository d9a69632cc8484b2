//! Log line timestamp extraction.
//!
//! Sequencer log lines carry a `[MM-DD|HH:MM:SS.mmm]` fragment with no year
//! and no timezone. Parsing combines the fragment with a caller-supplied
//! calendar year, so a run that crosses a year boundary comes out with a
//! negative duration rather than a corrected one.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Pre-compiled regex for the bracketed timestamp fragment.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2})-(\d{2})\|(\d{2}):(\d{2}):(\d{2})\.(\d{3})\]").unwrap()
});

/// Extracts the embedded timestamp from a log line, if any.
///
/// Most lines carry no timestamp fragment at all; those return `None`, as do
/// fragments that are not a valid calendar date or time (e.g. month 13).
pub fn parse_line_timestamp(line: &str, year: i32) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(line)?;

    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let hour: u32 = caps[3].parse().ok()?;
    let minute: u32 = caps[4].parse().ok()?;
    let second: u32 = caps[5].parse().ok()?;
    let milli: u32 = caps[6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)?;
    Some(NaiveDateTime::new(date, time))
}
