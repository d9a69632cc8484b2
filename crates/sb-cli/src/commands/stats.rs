//! Container resource-usage chart.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use sb_core::{ContainerSample, SeriesSummary, collect_container_samples};

/// Glyph ramp for sparkline rendering, lowest to highest.
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Rendering options for the stats command.
#[derive(Debug, Clone)]
pub struct Options {
    /// Container name rows are kept for.
    pub container: String,
    /// Chart width in columns.
    pub width: usize,
    /// Emit JSON instead of the chart.
    pub json: bool,
}

/// Runs the stats command against a `docker stats` capture.
pub fn run<W: std::io::Write>(writer: &mut W, stats_file: &Path, options: &Options) -> Result<()> {
    let text = std::fs::read_to_string(stats_file)
        .with_context(|| format!("failed to read {}", stats_file.display()))?;
    let lines: Vec<&str> = text.lines().collect();

    let samples = collect_container_samples(&lines, &options.container);
    tracing::debug!(
        samples = samples.len(),
        container = %options.container,
        "parsed stats capture"
    );

    let report = build_report(&samples, &options.container).with_context(|| {
        format!(
            "no stats rows for container {} in {}",
            options.container,
            stats_file.display()
        )
    })?;

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_stats_report(&report, options.width))?;
    }

    Ok(())
}

/// Computed stats report: one entry per charted metric.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub container: String,
    pub sample_count: usize,
    pub metrics: Vec<MetricReport>,
}

/// One charted metric with its summary and raw series.
#[derive(Debug, Serialize)]
pub struct MetricReport {
    pub label: &'static str,
    #[serde(flatten)]
    pub summary: SeriesSummary,
    pub values: Vec<f64>,
}

/// Builds the report data for a sample set; `None` when there are no samples.
fn build_report(samples: &[ContainerSample], container: &str) -> Option<StatsReport> {
    let series: [(&'static str, Vec<f64>); 3] = [
        (
            "CPU Usage (%)",
            samples.iter().map(|s| s.cpu_percent).collect(),
        ),
        (
            "Memory Usage (%)",
            samples.iter().map(|s| s.mem_percent).collect(),
        ),
        (
            "Memory Usage (MB)",
            samples.iter().map(|s| s.mem_usage_mb).collect(),
        ),
    ];

    let mut metrics = Vec::with_capacity(series.len());
    for (label, values) in series {
        let summary = SeriesSummary::compute(&values)?;
        metrics.push(MetricReport {
            label,
            summary,
            values,
        });
    }

    Some(StatsReport {
        container: container.to_string(),
        sample_count: samples.len(),
        metrics,
    })
}

/// Formats the human-readable chart report.
pub fn format_stats_report(report: &StatsReport, width: usize) -> String {
    let mut output = String::new();

    writeln!(output, "CONTAINER STATS: {}", report.container).unwrap();
    writeln!(output, "Samples: {}", report.sample_count).unwrap();

    for metric in &report.metrics {
        writeln!(output).unwrap();
        writeln!(output, "{}", metric.label).unwrap();
        writeln!(output, "  {}", sparkline(&metric.values, width)).unwrap();
        writeln!(
            output,
            "  max {:.2} at sample {}, min {:.2} at sample {}, mean {:.2}",
            metric.summary.max,
            metric.summary.max_index,
            metric.summary.min,
            metric.summary.min_index,
            metric.summary.mean,
        )
        .unwrap();
    }

    output
}

/// Renders a series as a sparkline at most `width` glyphs wide.
///
/// When the series is longer than the chart, consecutive samples are
/// bucketed by mean. Glyph height is normalized to the series min-max
/// range; a flat series renders at mid height.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let bucketed = bucket_means(values, width);
    let min = bucketed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = bucketed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let top = SPARK_LEVELS.len() - 1;

    bucketed
        .iter()
        .map(|&value| {
            let level = if range > 0.0 {
                (((value - min) / range) * top as f64).round() as usize
            } else {
                SPARK_LEVELS.len() / 2
            };
            SPARK_LEVELS[level.min(top)]
        })
        .collect()
}

/// Means of `values` split into at most `width` equal-size buckets.
#[allow(clippy::cast_precision_loss)]
fn bucket_means(values: &[f64], width: usize) -> Vec<f64> {
    let bucket_size = values.len().div_ceil(width);
    values
        .chunks(bucket_size)
        .map(|bucket| bucket.iter().sum::<f64>() / bucket.len() as f64)
        .collect()
}
