//! CLI command definitions and handlers.

pub mod analyze;
pub mod methods;

use clap::{Parser, Subcommand};

/// Veracity - media trust analysis
#[derive(Parser)]
#[command(name = "veracity")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared analyze arguments (inputs, thresholds, flags).
    #[command(flatten)]
    pub analyze: analyze::AnalyzeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze media for signs of manipulation
    Analyze(analyze::AnalyzeArgs),
    /// List the available detection methods
    Methods,
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every analyzed item was judged authentic.
    Success,
    /// At least one item was judged not authentic.
    NotAuthentic,
    /// The run could not be carried out.
    Error,
    /// The run was cancelled with Ctrl-C.
    Interrupted,
}

impl ExitCode {
    /// Numeric process status.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NotAuthentic => 1,
            Self::Error => 2,
            Self::Interrupted => 130,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}
