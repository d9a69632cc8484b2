//! Command-line analyzer for sequencer resequencing benchmarks.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
