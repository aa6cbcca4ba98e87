use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod logger;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = config::Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli).await {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            tracing::error!("{err:?}");
            logger::Logger::default().error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
