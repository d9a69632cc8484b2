//! Resequencing throughput report.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;

use sb_core::RunSummary;

/// Width of the label column in the human-readable report.
const LABEL_WIDTH: usize = 25;

/// Runs the tps command against a sequencer log file.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    log_file: &Path,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(log_file)
        .with_context(|| format!("failed to read {}", log_file.display()))?;
    let lines: Vec<&str> = text.lines().collect();
    let year = year.unwrap_or_else(|| Local::now().year());

    tracing::debug!(lines = lines.len(), year, "scanning sequencer log");

    let summary = sb_core::extract_run(&lines, year).with_context(|| {
        format!(
            "failed to extract resequencing run from {}",
            log_file.display()
        )
    })?;

    if json {
        writeln!(writer, "{}", format_run_report_json(&summary)?)?;
    } else {
        write!(writer, "{}", format_run_report(&summary))?;
    }

    Ok(())
}

/// Formats the human-readable run report.
pub fn format_run_report(summary: &RunSummary) -> String {
    let mut output = String::new();

    report_line(&mut output, "From Batch:", summary.from_batch());
    report_line(&mut output, "To Batch:", summary.halt_batch);
    match summary.startup_seconds {
        Some(seconds) => {
            report_line(&mut output, "Data Stream Startup:", format!("{seconds:.3} seconds"));
        }
        None => report_line(&mut output, "Data Stream Startup:", "n/a"),
    }
    report_line(&mut output, "Start Time:", summary.start_time);
    report_line(&mut output, "End Time:", summary.end_time);
    report_line(&mut output, "Total Transactions:", summary.tx_count);
    report_line(
        &mut output,
        "Re-sequencing Duration:",
        format!("{:.3} seconds", summary.duration_seconds),
    );
    report_line(&mut output, "TPS:", format!("{:.3}", summary.tps));

    output
}

/// Writes one `label value` line with a fixed-width label column.
fn report_line<V: std::fmt::Display>(output: &mut String, label: &str, value: V) {
    writeln!(output, "{label:<LABEL_WIDTH$} {value}").unwrap();
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonRunReport {
    pub from_batch: u64,
    pub to_batch: u64,
    pub startup_seconds: Option<f64>,
    pub start_time: String,
    pub end_time: String,
    pub total_transactions: u64,
    pub duration_seconds: f64,
    pub tps: f64,
}

/// Formats the run report as JSON.
pub fn format_run_report_json(summary: &RunSummary) -> Result<String> {
    let report = JsonRunReport {
        from_batch: summary.from_batch(),
        to_batch: summary.halt_batch,
        startup_seconds: summary.startup_seconds,
        start_time: summary.start_time.to_string(),
        end_time: summary.end_time.to_string(),
        total_transactions: summary.tx_count,
        duration_seconds: summary.duration_seconds,
        tps: summary.tps,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    use super::*;

    fn sample_summary() -> RunSummary {
        RunSummary {
            last_batch: 5000,
            halt_batch: 7500,
            startup_seconds: Some(2.5),
            start_time: NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(10, 24, 2)
                .unwrap(),
            end_time: NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(11, 4, 2)
                .unwrap(),
            tx_count: 60,
            duration_seconds: 2400.0,
            tps: 0.025,
        }
    }

    #[test]
    fn test_format_run_report() {
        let output = format_run_report(&sample_summary());

        insta::assert_snapshot!(output, @r"
        From Batch:               5001
        To Batch:                 7500
        Data Stream Startup:      2.500 seconds
        Start Time:               2025-06-15 10:24:02
        End Time:                 2025-06-15 11:04:02
        Total Transactions:       60
        Re-sequencing Duration:   2400.000 seconds
        TPS:                      0.025
        ");
    }

    #[test]
    fn test_report_without_startup_duration() {
        let summary = RunSummary {
            startup_seconds: None,
            ..sample_summary()
        };

        let output = format_run_report(&summary);

        assert!(output.contains("Data Stream Startup:      n/a\n"));
    }

    #[test]
    fn test_report_label_column_is_fixed_width() {
        let output = format_run_report(&sample_summary());

        for line in output.lines() {
            let label_field = &line[..=LABEL_WIDTH];
            assert!(label_field.ends_with(' '), "short label field: {line}");
        }
    }

    #[test]
    fn test_json_report_fields() {
        let json = format_run_report_json(&sample_summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["from_batch"], 5001);
        assert_eq!(value["to_batch"], 7500);
        assert_eq!(value["startup_seconds"], 2.5);
        assert_eq!(value["start_time"], "2025-06-15 10:24:02");
        assert_eq!(value["total_transactions"], 60);
        assert_eq!(value["duration_seconds"], 2400.0);
        assert_eq!(value["tps"], 0.025);
    }

    #[test]
    fn test_json_report_null_startup() {
        let summary = RunSummary {
            startup_seconds: None,
            ..sample_summary()
        };

        let json = format_run_report_json(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["startup_seconds"].is_null());
    }

    #[test]
    fn test_run_reads_log_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "INFO [06-15|10:23:45.000] Last batch 10 resequencing from batch 11 to 20"
        )
        .unwrap();
        writeln!(file, "INFO [06-15|10:23:46.000] reading stream").unwrap();
        writeln!(
            file,
            "INFO [06-15|10:24:00.000] Resequence from batch 11 to 20 in data stream"
        )
        .unwrap();
        writeln!(file, "INFO [06-15|10:24:05.000] Finish block 1 with 30 transactions").unwrap();
        writeln!(file, "INFO [06-15|10:24:10.000] Resequencing completed.").unwrap();
        file.flush().unwrap();

        let mut output = Vec::new();
        run(&mut output, file.path(), Some(2025), false).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("From Batch:               11\n"));
        assert!(text.contains("TPS:                      3.000\n"));
    }

    #[test]
    fn test_run_fails_on_missing_file() {
        let mut output = Vec::new();

        let err = run(&mut output, Path::new("/nonexistent/seq.log"), Some(2025), false)
            .unwrap_err();

        assert!(err.to_string().contains("failed to read"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_surfaces_extraction_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "just one line").unwrap();
        file.flush().unwrap();

        let mut output = Vec::new();
        let err = run(&mut output, file.path(), Some(2025), false).unwrap_err();

        assert!(format!("{err:#}").contains("does not contain enough lines"));
    }
}
