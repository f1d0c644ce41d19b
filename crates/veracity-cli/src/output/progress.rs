//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use tracing::trace;
use veracity_core::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
///
/// Tracks batch percent when a bar is shown; otherwise prints a status line
/// for every item that is not judged authentic. Items without a result are
/// always reported unless quiet.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    names: Vec<String>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `names` - Display names of the batch items, in input order
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-item status
    #[must_use]
    pub fn new(names: Vec<String>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                names,
                quiet: true,
            };
        }

        let bar = show_bar.then(|| {
            let bar = IndicatifBar::new(100);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, names, quiet }
    }

    fn name(&self, index: usize) -> &str {
        self.names.get(index).map_or("<unknown>", String::as_str)
    }

    /// Prints a line without tearing the bar.
    fn report(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { name, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(name);
                }
            }
            ProgressEvent::Checkpoint { index, percent } => {
                trace!("{}: {percent}%", self.name(index));
            }
            ProgressEvent::Completed { index, result } => {
                if self.bar.is_none() && !result.is_authentic() {
                    self.report(&format!(
                        "{}: trust score {}, possible manipulation",
                        self.name(index),
                        result.trust_score()
                    ));
                }
            }
            ProgressEvent::Failed { index, reason, .. } => {
                self.report(&format!(
                    "{}: analysis unavailable ({reason})",
                    self.name(index)
                ));
            }
            ProgressEvent::Cancelled { index, .. } => {
                self.report(&format!(
                    "{}: analysis unavailable (cancelled)",
                    self.name(index)
                ));
            }
            ProgressEvent::BatchProgress { percent } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(u64::from(percent));
                }
            }
            ProgressEvent::Finished {
                completed,
                failed,
                cancelled,
            } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "Done: {completed} analyzed, {failed} failed, {cancelled} cancelled"
                    ));
                }
            }
        }
    }
}
