//! Placeholder detection methods.
//!
//! These stand in for model-backed detectors: each draws a score and a
//! confidence from a fixed range, using a pseudo-random sampler keyed by
//! seed, method name and media id so a run is reproducible.

use sha2::{Digest, Sha256};

use crate::domain::{
    DetectionMethod, DetectionMethodOutput, MediaItem, MediaKind, MethodCategory,
};
use crate::error::DetectionFailure;

/// A closed interval `[min, min + span]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    /// Lower bound.
    pub min: f64,
    /// Width of the interval.
    pub span: f64,
}

impl ScoreRange {
    /// Creates a range starting at `min` with width `span`.
    #[must_use]
    pub const fn new(min: f64, span: f64) -> Self {
        Self { min, span }
    }

    /// Maps a unit sample onto the range.
    #[must_use]
    pub fn at(&self, unit: f64) -> f64 {
        self.min + unit * self.span
    }

    /// Whether `value` lies in the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.min + self.span).contains(&value)
    }
}

/// Deterministic sampler producing unit values in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSampler {
    seed: u64,
}

impl PlaceholderSampler {
    /// Creates a sampler for `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Draws two unit samples for `method` on `media`.
    #[must_use]
    pub fn draw(&self, method: &str, media: &MediaItem) -> (f64, f64) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(method.as_bytes());
        hasher.update(media.id.as_bytes());
        let digest = hasher.finalize();

        let mut first = [0u8; 8];
        let mut second = [0u8; 8];
        first.copy_from_slice(&digest[..8]);
        second.copy_from_slice(&digest[8..16]);
        (
            unit(u64::from_le_bytes(first)),
            unit(u64::from_le_bytes(second)),
        )
    }
}

/// Top 53 bits of `bits` as a float in `[0, 1)`.
#[allow(clippy::cast_precision_loss)]
fn unit(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// A detection method that reports sampled scores.
#[derive(Debug, Clone)]
pub struct PlaceholderMethod {
    name: &'static str,
    category: MethodCategory,
    only_kind: Option<MediaKind>,
    score: ScoreRange,
    confidence: ScoreRange,
    details: &'static str,
    sampler: PlaceholderSampler,
}

impl PlaceholderMethod {
    /// Creates a placeholder method applying to every kind.
    #[must_use]
    pub const fn new(
        name: &'static str,
        category: MethodCategory,
        score: ScoreRange,
        confidence: ScoreRange,
        details: &'static str,
        sampler: PlaceholderSampler,
    ) -> Self {
        Self {
            name,
            category,
            only_kind: None,
            score,
            confidence,
            details,
            sampler,
        }
    }

    /// Restricts the method to media of `kind`.
    #[must_use]
    pub fn only_for(mut self, kind: MediaKind) -> Self {
        self.only_kind = Some(kind);
        self
    }

    /// Score range this method samples from.
    #[must_use]
    pub const fn score_range(&self) -> ScoreRange {
        self.score
    }

    /// Confidence range this method samples from.
    #[must_use]
    pub const fn confidence_range(&self) -> ScoreRange {
        self.confidence
    }
}

impl DetectionMethod for PlaceholderMethod {
    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> MethodCategory {
        self.category
    }

    fn applies_to(&self, kind: MediaKind) -> bool {
        self.only_kind.map_or(true, |only| only == kind)
    }

    fn detect(&self, media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
        if !self.applies_to(media.kind) {
            return Err(DetectionFailure::new(
                self.name,
                format!("cannot evaluate {} media", media.kind),
            ));
        }

        let (score_unit, confidence_unit) = self.sampler.draw(self.name, media);
        Ok(DetectionMethodOutput::new(
            self.name,
            self.category,
            self.score.at(score_unit),
            self.confidence.at(confidence_unit),
            self.details,
        ))
    }
}
