//! Container resource-usage sample parsing.
//!
//! Parses captured `docker stats` output, one sampled table row per line,
//! into CPU and memory series plus per-series extremes for charting.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Pre-compiled regex for memory size strings such as `129MiB` or `35.18GiB`.
static MEM_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([\d.]+)([MG]i?B)").unwrap());

/// Number of whitespace-separated columns a usable stats row must have.
///
/// A `docker stats` row splits as: id, name, cpu%, mem usage, `/`, mem
/// limit, mem%, and the network/block IO columns after that. Parsing uses
/// columns 2, 3 and 6.
const MIN_STATS_COLUMNS: usize = 7;

/// Errors from [`parse_container_sample`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// The row has fewer columns than a `docker stats` table line.
    #[error("stats row has only {columns} columns")]
    TooFewColumns { columns: usize },
    /// A percentage column did not parse as a number.
    #[error("column {column} is not a percentage: {value}")]
    InvalidPercent { column: usize, value: String },
}

/// One sampled `docker stats` row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSample {
    pub cpu_percent: f64,
    pub mem_usage_mb: f64,
    pub mem_percent: f64,
}

/// Converts a size string such as `129MiB` or `35.18GiB` to megabytes.
///
/// Binary units scale by 1024, decimal ones by 1000. Unrecognized strings
/// yield `None`.
pub fn parse_size_to_mb(size: &str) -> Option<f64> {
    let caps = MEM_SIZE_RE.captures(size.trim())?;
    let value: f64 = caps[1].parse().ok()?;
    let factor = match caps[2].to_ascii_uppercase().as_str() {
        "MIB" | "MB" => 1.0,
        "GIB" => 1024.0,
        "GB" => 1000.0,
        _ => return None,
    };
    Some(value * factor)
}

/// Parses one `docker stats` table row into a sample.
///
/// The memory usage column falls back to zero when it cannot be parsed, so
/// a single odd size string does not discard the row's CPU reading.
pub fn parse_container_sample(line: &str) -> Result<ContainerSample, ContainerError> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < MIN_STATS_COLUMNS {
        return Err(ContainerError::TooFewColumns { columns: columns.len() });
    }

    let cpu_percent = parse_percent(columns[2], 2)?;
    let mem_percent = parse_percent(columns[6], 6)?;
    let mem_usage_mb = parse_size_to_mb(columns[3]).unwrap_or(0.0);

    Ok(ContainerSample {
        cpu_percent,
        mem_usage_mb,
        mem_percent,
    })
}

fn parse_percent(value: &str, column: usize) -> Result<f64, ContainerError> {
    value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ContainerError::InvalidPercent {
            column,
            value: value.to_string(),
        })
}

/// Filters and parses the rows for one container out of a stats capture.
///
/// Keeps lines naming the container, drops repeated table headers, and skips
/// rows that fail to parse rather than aborting the whole capture.
pub fn collect_container_samples(lines: &[&str], container: &str) -> Vec<ContainerSample> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.contains(container) && !line.contains("CONTAINER ID"))
        .filter_map(|line| match parse_container_sample(line) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed stats row");
                None
            }
        })
        .collect()
}

/// Extremes and mean of one metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Index of the first sample attaining `max`.
    pub max_index: usize,
    /// Index of the first sample attaining `min`.
    pub min_index: usize,
}

impl SeriesSummary {
    /// Summarizes a series; `None` when it is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let mut summary = Self {
            max: first,
            min: first,
            mean: 0.0,
            max_index: 0,
            min_index: 0,
        };

        let mut sum = 0.0;
        for (index, &value) in values.iter().enumerate() {
            if value > summary.max {
                summary.max = value;
                summary.max_index = index;
            }
            if value < summary.min {
                summary.min = value;
                summary.min_index = index;
            }
            sum += value;
        }
        summary.mean = sum / values.len() as f64;

        Some(summary)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const SAMPLE_ROW: &str = "1a2b3c4d5e6f   xlayer-seq   45.32%   1.5GiB / 15.61GiB   9.61%   1.2MB / 800kB   12.4MB / 0B   25";

    #[test]
    fn test_parse_size_binary_units() {
        assert_eq!(parse_size_to_mb("129MiB"), Some(129.0));
        assert_eq!(parse_size_to_mb("1.5GiB"), Some(1536.0));
        assert_eq!(parse_size_to_mb("35.18GiB"), Some(35.18 * 1024.0));
    }

    #[test]
    fn test_parse_size_decimal_units() {
        assert_eq!(parse_size_to_mb("250MB"), Some(250.0));
        assert_eq!(parse_size_to_mb("512MB"), Some(512.0));
        assert_eq!(parse_size_to_mb("2GB"), Some(2000.0));
    }

    #[test]
    fn test_parse_size_is_case_insensitive() {
        assert_eq!(parse_size_to_mb("129mib"), Some(129.0));
        assert_eq!(parse_size_to_mb("1.5gib"), Some(1536.0));
        assert_eq!(parse_size_to_mb("250mb"), Some(250.0));
    }

    #[test]
    fn test_parse_size_tolerates_surrounding_whitespace() {
        assert_eq!(parse_size_to_mb("  129MiB "), Some(129.0));
    }

    #[test]
    fn test_parse_size_rejects_other_units() {
        assert_eq!(parse_size_to_mb("800kB"), None);
        assert_eq!(parse_size_to_mb("12TiB"), None);
        assert_eq!(parse_size_to_mb("MiB"), None);
        assert_eq!(parse_size_to_mb(""), None);
        assert_eq!(parse_size_to_mb("1.2.3MiB"), None);
    }

    #[test]
    fn test_parse_container_sample() {
        let sample = parse_container_sample(SAMPLE_ROW).unwrap();

        assert_eq!(sample.cpu_percent, 45.32);
        assert_eq!(sample.mem_usage_mb, 1536.0);
        assert_eq!(sample.mem_percent, 9.61);
    }

    #[test]
    fn test_sample_with_unparseable_memory_falls_back_to_zero() {
        let row = "1a2b3c4d5e6f   xlayer-seq   45.32%   900kB / 15.61GiB   9.61%   1.2MB / 800kB   12.4MB / 0B   25";

        let sample = parse_container_sample(row).unwrap();

        assert_eq!(sample.cpu_percent, 45.32);
        assert_eq!(sample.mem_usage_mb, 0.0);
    }

    #[test]
    fn test_sample_with_too_few_columns() {
        assert_eq!(
            parse_container_sample("abc xlayer-seq 45.32%"),
            Err(ContainerError::TooFewColumns { columns: 3 })
        );
    }

    #[test]
    fn test_sample_with_bad_percent() {
        let row = "1a2b3c4d5e6f   xlayer-seq   n/a   1.5GiB / 15.61GiB   9.61%   1.2MB / 800kB   12.4MB / 0B   25";

        assert_eq!(
            parse_container_sample(row),
            Err(ContainerError::InvalidPercent {
                column: 2,
                value: "n/a".to_string()
            })
        );
    }

    #[test]
    fn test_collect_filters_by_container_name() {
        let lines = vec![
            "CONTAINER ID   NAME   CPU %   MEM USAGE / LIMIT   MEM %   NET I/O   BLOCK I/O   PIDS",
            SAMPLE_ROW,
            "9f8e7d6c5b4a   other-node   12.00%   256MiB / 15.61GiB   1.60%   1.2MB / 800kB   0B / 0B   12",
            "",
            SAMPLE_ROW,
        ];

        let samples = collect_container_samples(&lines, "xlayer-seq");

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].cpu_percent, 45.32);
    }

    #[test]
    fn test_collect_skips_malformed_rows() {
        let lines = vec![SAMPLE_ROW, "xlayer-seq crashed", SAMPLE_ROW];

        let samples = collect_container_samples(&lines, "xlayer-seq");

        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_collect_with_no_matches_is_empty() {
        let samples = collect_container_samples(&[SAMPLE_ROW], "erigon-rpc");

        assert!(samples.is_empty());
    }

    #[test]
    fn test_series_summary() {
        let summary = SeriesSummary::compute(&[2.0, 8.0, 1.0, 8.0, 1.0, 4.0]).unwrap();

        assert_eq!(summary.max, 8.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.max_index, 1);
        assert_eq!(summary.min_index, 2);
    }

    #[test]
    fn test_series_summary_of_constant_series() {
        let summary = SeriesSummary::compute(&[3.5, 3.5, 3.5]).unwrap();

        assert_eq!(summary.max, 3.5);
        assert_eq!(summary.min, 3.5);
        assert_eq!(summary.mean, 3.5);
        assert_eq!(summary.max_index, 0);
        assert_eq!(summary.min_index, 0);
    }

    #[test]
    fn test_series_summary_of_empty_series() {
        assert_eq!(SeriesSummary::compute(&[]), None);
    }
}
