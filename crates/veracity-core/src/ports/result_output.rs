//! Result output port for exporting analysis results.

use crate::domain::{AnalysisResult, MediaItem};

/// Port for outputting analysis results.
pub trait ResultOutput: Send + Sync {
    /// Writes a single analysis result alongside the media it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, media: &MediaItem, result: &AnalysisResult) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
