use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sb_cli::commands::{stats, tps};
use sb_cli::{Cli, Commands, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Diagnostics go to stderr so stdout stays parseable (e.g. --json)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // One error line naming the failed precondition; every failure
            // kind shares the same exit code
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Tps {
            log_file,
            year,
            json,
        }) => tps::run(&mut std::io::stdout(), log_file, *year, *json),
        Some(Commands::Stats {
            stats_file,
            container,
            width,
            json,
        }) => {
            let config = Config::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let options = stats::Options {
                container: container.clone().unwrap_or(config.container),
                width: width.unwrap_or(config.chart_width),
                json: *json,
            };
            stats::run(&mut std::io::stdout(), stats_file, &options)
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
