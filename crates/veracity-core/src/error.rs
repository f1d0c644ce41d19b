//! Error types raised by the analysis pipeline.

use thiserror::Error;

/// Errors that abort the analysis of a single media item.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The aggregator was handed zero method outputs.
    #[error("no detection method outputs to aggregate")]
    EmptyMethodSet,
    /// The run was cancelled before the item finished.
    #[error("analysis cancelled")]
    Cancelled,
    /// Two detection methods in one runner share a name.
    #[error("duplicate detection method name: {0}")]
    DuplicateMethod(String),
}

/// A detection method could not evaluate a media item.
///
/// Recovered by the runner into a zero-score marker output; never surfaced to
/// batch callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} could not evaluate media: {reason}")]
pub struct DetectionFailure {
    /// Name of the failing method.
    pub method: String,
    /// Why the method gave up.
    pub reason: String,
}

impl DetectionFailure {
    /// Creates a new failure for `method`.
    pub fn new(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

/// A method reported a score or confidence outside `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{method} returned {field} = {value}, outside [0, 1]")]
pub struct InvalidScoreRange {
    /// Name of the offending method.
    pub method: String,
    /// Either `"score"` or `"confidence"`.
    pub field: &'static str,
    /// The raw value before clamping.
    pub value: f64,
}
