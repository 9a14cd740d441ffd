//! Dome Storage Main Entry Point
//!
//! Runs one command against the directory-backed project store configured
//! through the environment.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use dome_storage::{Cli, CliError, Command, Config, Dependencies, LogFormat};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging. Logs go to stderr so command output stays clean.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dome_storage=info,dome_storage_repository=info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

fn run(command: &Command, config: &Config) -> Result<(), CliError> {
    let deps = Dependencies::new(config)?;
    command.execute(&deps, &mut io::stdout().lock())
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env();
    init_tracing(config.log_format);
    config.log_rejected();

    // Help and version requests exit 0, usage errors exit 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    info!(
        service_name = "dome-storage",
        service_version = env!("CARGO_PKG_VERSION"),
        "Starting"
    );

    match run(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
