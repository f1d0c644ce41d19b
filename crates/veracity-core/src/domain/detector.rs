//! Detection method trait for pluggable detectors.

use super::{DetectionMethodOutput, MediaItem, MediaKind, MethodCategory};
use crate::error::DetectionFailure;

/// Trait for implementing detection methods.
///
/// Each method evaluates a media item for one kind of manipulation signal
/// and reports an authenticity score with its own confidence. Methods must
/// not mutate the item and may be randomized or model-driven.
pub trait DetectionMethod: Send + Sync {
    /// Returns the human-readable name of this method.
    fn name(&self) -> &str;

    /// Returns the signal category this method inspects.
    fn category(&self) -> MethodCategory;

    /// Whether this method runs for media of the given kind.
    fn applies_to(&self, kind: MediaKind) -> bool {
        let _ = kind;
        true
    }

    /// Evaluates a media item.
    ///
    /// # Errors
    ///
    /// Returns [`DetectionFailure`] if the method cannot process this media.
    fn detect(&self, media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure>;
}
