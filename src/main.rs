//! m3uprep CLI entry point

use clap::Parser;
use m3uprep::config::{Cli, Settings};
use m3uprep::pipeline;
use m3uprep::M3uError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = Settings::from_cli(&cli);

    // Individual album failures are reported per album and do not change the exit status
    match pipeline::run(&settings) {
        Ok(result) => {
            tracing::info!(
                "{} albums: {} successful, {} failed",
                result.total_albums,
                result.successful,
                result.failed
            );
            ExitCode::SUCCESS
        }
        Err(M3uError::PathNotFound(path)) => {
            eprintln!("Error: {} does not exist", path.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
