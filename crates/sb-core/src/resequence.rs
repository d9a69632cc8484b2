//! Resequencing run extraction.
//!
//! Scans a sequencer log in two phases: forward to the timestamped start
//! marker, then on through per-block completion lines until the completion
//! marker, accumulating the transaction count along the way.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::markers;
use crate::timestamp::parse_line_timestamp;

/// Minimum line count for a log that can carry the header and both markers.
const MIN_LOG_LINES: usize = 5;

/// Errors from [`extract_run`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The log is too short to contain a run at all.
    #[error("log file does not contain enough lines ({lines})")]
    InsufficientData { lines: usize },
    /// A required field is absent from the header line.
    #[error("header line is missing the {0} field")]
    MissingField(&'static str),
    /// No timestamped start marker anywhere in the log.
    #[error("resequencing start marker not found")]
    StartMarkerNotFound,
    /// No timestamped completion marker at or after the start marker.
    #[error("resequencing completion marker not found")]
    EndMarkerNotFound,
}

/// The derived summary of a single resequencing run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Last batch already sequenced before the run, from the header line.
    pub last_batch: u64,
    /// Batch number the run halts on, from the header line.
    pub halt_batch: u64,
    /// Seconds between the first two log lines, when both carry timestamps.
    /// Diagnostic only; not part of the TPS calculation.
    pub startup_seconds: Option<f64>,
    /// Timestamp of the start marker line.
    pub start_time: NaiveDateTime,
    /// Timestamp of the completion marker line.
    pub end_time: NaiveDateTime,
    /// Transactions accumulated from per-block completion lines.
    pub tx_count: u64,
    /// End minus start in seconds. Zero or negative when the log breaks the
    /// chronological-order assumption (e.g. a run crossing a year boundary).
    pub duration_seconds: f64,
    /// Transactions per second, or zero when the duration is not positive.
    pub tps: f64,
}

impl RunSummary {
    /// First batch of the run, one past the last already sequenced.
    #[must_use]
    pub const fn from_batch(&self) -> u64 {
        self.last_batch + 1
    }
}

/// Scans a resequencing log into a [`RunSummary`].
///
/// `lines` is the full log split into lines; `year` is the calendar year
/// applied to every embedded timestamp, since the log itself carries none.
///
/// The transaction scan starts at the start marker line itself, so a line
/// that is both a marker and a block completion is counted. A marker line
/// whose own timestamp cannot be parsed is reported as the marker not being
/// found.
#[allow(clippy::cast_precision_loss)]
pub fn extract_run(lines: &[&str], year: i32) -> Result<RunSummary, ExtractError> {
    if lines.len() < MIN_LOG_LINES {
        return Err(ExtractError::InsufficientData { lines: lines.len() });
    }

    let last_batch =
        markers::parse_last_batch(lines[0]).ok_or(ExtractError::MissingField("last batch"))?;
    let halt_batch =
        markers::parse_halt_batch(lines[0]).ok_or(ExtractError::MissingField("halt batch"))?;

    let startup_seconds = match (
        parse_line_timestamp(lines[0], year),
        parse_line_timestamp(lines[1], year),
    ) {
        (Some(first), Some(second)) => Some(seconds_between(first, second)),
        _ => None,
    };

    let (start_index, start_time) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| markers::is_resequence_start(line))
        .and_then(|(index, line)| Some((index, parse_line_timestamp(line, year)?)))
        .ok_or(ExtractError::StartMarkerNotFound)?;

    let mut tx_count: u64 = 0;
    let mut end_time = None;
    for &line in &lines[start_index..] {
        if markers::mentions_finished_block(line) {
            match markers::parse_finished_block_txs(line) {
                Some(txs) => tx_count = tx_count.saturating_add(txs),
                // Completion lines without a parseable count contribute zero
                None => tracing::debug!(line, "finished-block line without transaction count"),
            }
        }
        if markers::is_resequence_end(line) {
            end_time = parse_line_timestamp(line, year);
            break;
        }
    }
    let end_time = end_time.ok_or(ExtractError::EndMarkerNotFound)?;

    let duration_seconds = seconds_between(start_time, end_time);
    let tps = if duration_seconds > 0.0 {
        tx_count as f64 / duration_seconds
    } else {
        0.0
    };

    tracing::debug!(tx_count, duration_seconds, "extracted resequencing run");

    Ok(RunSummary {
        last_batch,
        halt_batch,
        startup_seconds,
        start_time,
        end_time,
        tx_count,
        duration_seconds,
        tps,
    })
}

/// Signed delta in seconds at millisecond precision.
#[allow(clippy::cast_precision_loss)]
fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}
