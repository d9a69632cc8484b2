//! Pattern matching for the fixed-format lines a resequencing run emits.
//!
//! Each pattern the extraction depends on gets its own named function so it
//! can be pinned against literal log lines in tests.

use std::sync::LazyLock;

use regex::Regex;

/// Pre-compiled regex for the last-batch field on the header line.
static LAST_BATCH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Last batch (\d+)").unwrap());

/// Pre-compiled regex for the halt-batch field on the header line.
static HALT_BATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"resequencing from batch \d+ to (\d+)").unwrap());

/// Pre-compiled regex for per-block completion lines.
static FINISH_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Finish block \d+ with (\d+) transactions").unwrap());

/// Parses the last sequenced batch number from the header line.
pub fn parse_last_batch(line: &str) -> Option<u64> {
    LAST_BATCH_RE.captures(line)?[1].parse().ok()
}

/// Parses the batch number the run will halt on from the header line.
pub fn parse_halt_batch(line: &str) -> Option<u64> {
    HALT_BATCH_RE.captures(line)?[1].parse().ok()
}

/// Whether the line marks the start of resequencing proper.
///
/// Both fragments must appear on the same line.
pub fn is_resequence_start(line: &str) -> bool {
    line.contains("Resequence from batch") && line.contains("in data stream")
}

/// Whether the line marks the completion of the run.
///
/// The trailing period is part of the marker.
pub fn is_resequence_end(line: &str) -> bool {
    line.contains("Resequencing completed.")
}

/// Whether the line reports a finished block at all, parseable or not.
pub fn mentions_finished_block(line: &str) -> bool {
    line.contains("Finish block")
}

/// Parses the transaction count from a per-block completion line.
pub fn parse_finished_block_txs(line: &str) -> Option<u64> {
    FINISH_BLOCK_RE.captures(line)?[1].parse().ok()
}
