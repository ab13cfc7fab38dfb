mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    let outcome = match &cli.command {
        Some(Commands::Generate(args)) => {
            commands::generate::run(&cli, args).map(|report| report.is_success())
        }
        Some(Commands::Validate(args)) => commands::validate::run(&cli, args),
        Some(Commands::Info(args)) => commands::info::run(&cli, args).map(|_| true),
        Some(Commands::Init(args)) => commands::init::run(&cli, args).map(|_| true),
        None => commands::generate::run_default(&cli).map(|report| report.is_success()),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `-q` and `-v` take precedence over `RUST_LOG`.
fn init_tracing(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
