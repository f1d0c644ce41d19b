//! Analyze command - score media for signs of manipulation.

use std::io::IsTerminal;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};
use veracity_adapters::MediaIntake;
use veracity_core::{
    standard_methods, Aggregator, AggregatorConfig, BatchConfig, BatchCoordinator, BatchReport,
    CancellationToken, DetectionRunner, MediaItem, MediaSource, MethodSelection, ResultOutput,
    RunnerConfig,
};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{CsvOutput, JsonLayout, JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
    /// Comma-separated summary rows
    Csv,
}

impl OutputFormat {
    fn from_config(name: &str) -> Option<Self> {
        match name {
            "jsonl" => Some(Self::Jsonl),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Hardcoded default values.
mod defaults {
    pub const THRESHOLD: u8 = 60;
    pub const WORKERS: usize = 1;
    pub const SEED: u64 = 0;
}

/// Parse and validate an authenticity threshold (0-100).
fn parse_threshold(s: &str) -> Result<u8, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid score"))?;
    if value <= 100 {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}

/// Parse a worker count (at least 1).
fn parse_workers(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("worker count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a valid worker count")),
    }
}

/// Shared arguments for media analysis.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Files, directories or http(s) URLs to analyze
    pub inputs: Vec<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Disable facial landmark analysis
    #[arg(long)]
    pub no_facial: bool,

    /// Disable temporal coherence analysis
    #[arg(long)]
    pub no_temporal: bool,

    /// Disable compression artifact analysis
    #[arg(long)]
    pub no_compression: bool,

    /// Disable spectral audio analysis
    #[arg(long)]
    pub no_spectral: bool,

    /// Trust scores strictly above this are authentic (0-100)
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<u8>,

    /// Number of items analyzed concurrently
    #[arg(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Run each item's detection methods concurrently
    #[arg(long)]
    pub parallel_methods: bool,

    /// Seed for the placeholder score sampler
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    ///
    /// For method toggles: CLI `--no-*` always wins. Config can enable/disable
    /// only when the CLI flag wasn't set.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        let toggles = [
            (&mut args.no_facial, config.methods.facial),
            (&mut args.no_temporal, config.methods.temporal),
            (&mut args.no_compression, config.methods.compression),
            (&mut args.no_spectral, config.methods.spectral),
        ];
        for (disabled, enabled) in toggles {
            if !*disabled {
                if let Some(enabled) = enabled {
                    *disabled = !enabled;
                }
            }
        }

        // Out-of-range config values were already dropped by `AppConfig::load`.
        args.threshold = args.threshold.or_else(|| {
            config
                .analysis
                .threshold
                .and_then(|t| u8::try_from(t).ok())
        });
        args.workers = args.workers.or(config.general.workers);
        args.seed = args.seed.or(config.general.seed);
        if !args.parallel_methods {
            args.parallel_methods = config.analysis.parallel_methods.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    fn threshold(&self) -> u8 {
        self.threshold.unwrap_or(defaults::THRESHOLD)
    }

    fn workers(&self) -> usize {
        self.workers.unwrap_or(defaults::WORKERS).max(1)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or(defaults::SEED)
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn selection(&self) -> MethodSelection {
        MethodSelection {
            facial: !self.no_facial,
            temporal: !self.no_temporal,
            compression: !self.no_compression,
            spectral: !self.no_spectral,
        }
    }
}

/// Result of running the analyze command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct AnalyzeOutcome {
    /// Items with a result.
    pub analyzed: usize,
    /// Items judged not authentic.
    pub not_authentic: usize,
    /// Inputs that could not be turned into media items.
    pub skipped: usize,
    /// Items whose analysis failed.
    pub failed: usize,
    /// Items skipped by cancellation.
    pub cancelled: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeOutcome> {
    info!("Running analyze command on {} inputs", args.inputs.len());

    if args.inputs.is_empty() {
        anyhow::bail!("No inputs specified");
    }

    let methods = standard_methods(args.selection(), args.seed());
    if methods.is_empty() {
        warn!("All detection methods disabled, nothing to analyze");
        return Ok(AnalyzeOutcome {
            analyzed: 0,
            not_authentic: 0,
            skipped: 0,
            failed: 0,
            cancelled: 0,
            exit_code: ExitCode::Success,
        });
    }

    let source = MediaIntake::new(args.inputs.clone(), args.recursive);
    let (items, skipped) = collect_items(&source, args.quiet);

    let runner = DetectionRunner::new(
        methods,
        RunnerConfig {
            parallel_methods: args.parallel_methods,
        },
    )?;
    let coordinator = BatchCoordinator::new(
        runner,
        Aggregator::new(AggregatorConfig {
            authenticity_threshold: args.threshold(),
        }),
        BatchConfig {
            workers: args.workers(),
        },
    );

    let token = CancellationToken::new();
    install_interrupt_handler(&token);

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(
        items.iter().map(|m| m.name.clone()).collect(),
        args.quiet,
        show_progress,
    );

    let output = build_output(args);
    let report = coordinator.run_with_output(&items, &progress, output.as_ref(), &token)?;

    Ok(outcome(&report, skipped, token.is_cancelled()))
}

/// Drains the intake, reporting inputs that cannot be analyzed.
fn collect_items(source: &dyn MediaSource, quiet: bool) -> (Vec<MediaItem>, usize) {
    let mut items = Vec::with_capacity(source.count_hint().unwrap_or(0));
    let mut skipped = 0usize;

    for item in source.items() {
        match item {
            Ok(media) => items.push(media),
            Err(e) => {
                if !quiet {
                    eprintln!("WARN: Skipping input: {e:#}");
                }
                skipped += 1;
            }
        }
    }

    debug!("Collected {} media items, skipped {skipped}", items.len());
    (items, skipped)
}

fn build_output(args: &AnalyzeArgs) -> Box<dyn ResultOutput> {
    match args.format() {
        OutputFormat::Jsonl => Box::new(JsonOutput::stdout(JsonLayout::Lines)),
        OutputFormat::Json => Box::new(JsonOutput::stdout(JsonLayout::Array {
            pretty: args.pretty,
        })),
        OutputFormat::Csv => Box::new(CsvOutput::stdout()),
    }
}

/// Cancels `token` on Ctrl-C.
fn install_interrupt_handler(token: &CancellationToken) {
    let token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("Failed to install Ctrl-C handler: {e}");
    }
}

/// Derives the exit code from a finished batch.
fn outcome(report: &BatchReport, skipped: usize, interrupted: bool) -> AnalyzeOutcome {
    let not_authentic = report.results().filter(|r| !r.is_authentic()).count();
    let unavailable = skipped + report.failed();

    let exit_code = if interrupted {
        ExitCode::Interrupted
    } else if not_authentic > 0 {
        ExitCode::NotAuthentic
    } else if report.completed() == 0 && unavailable > 0 {
        ExitCode::Error
    } else {
        ExitCode::Success
    };

    AnalyzeOutcome {
        analyzed: report.completed(),
        not_authentic,
        skipped,
        failed: report.failed(),
        cancelled: report.cancelled(),
        exit_code,
    }
}
