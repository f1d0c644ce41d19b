//! Veracity CLI - media trust analysis tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::analyze::AnalyzeArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Analyze(args)) => analyze(args),
        Some(Commands::Methods) => match commands::methods::run() {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: analyze with flattened args
            if cli.analyze.inputs.is_empty() {
                eprintln!("error: No inputs specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            analyze(cli.analyze)
        }
    };

    exit_code.into()
}

fn analyze(args: AnalyzeArgs) -> ExitCode {
    let args = AnalyzeArgs::with_config(args, &AppConfig::load());
    match commands::analyze::run(&args) {
        Ok(outcome) => outcome.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
