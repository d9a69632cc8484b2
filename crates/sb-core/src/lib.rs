//! Core analysis logic for sequencer resequencing benchmarks.
//!
//! This crate contains the parsing and summarization building blocks:
//! - Timestamp extraction for the `[MM-DD|HH:MM:SS.mmm]` fragment sequencer
//!   log lines carry
//! - Marker matching for the header fields and start/end lines of a
//!   resequencing run
//! - Run extraction, scanning a whole log into a [`RunSummary`] with
//!   duration and TPS
//! - Container stats parsing, turning `docker stats` captures into
//!   per-metric series and [`SeriesSummary`] extremes

pub mod container;
pub mod markers;
mod resequence;
pub mod timestamp;

pub use container::{
    ContainerError, ContainerSample, SeriesSummary, collect_container_samples,
    parse_container_sample, parse_size_to_mb,
};
pub use resequence::{ExtractError, RunSummary, extract_run};
pub use timestamp::parse_line_timestamp;
