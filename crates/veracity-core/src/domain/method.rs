//! Per-method detection output.

use serde::{Deserialize, Serialize};

use crate::error::InvalidScoreRange;

/// Which signal a detection method inspects.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodCategory {
    /// Pixel-level or facial consistency.
    Visual,
    /// Frequency/voice characteristics.
    Audio,
    /// Container, compression, fingerprint data.
    Metadata,
    /// Frame-to-frame coherence.
    Temporal,
}

impl MethodCategory {
    /// Lowercase identifier used in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Audio => "audio",
            Self::Metadata => "metadata",
            Self::Temporal => "temporal",
        }
    }
}

/// The result of one detection method on one media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionMethodOutput {
    /// Human-readable method name, unique within one run.
    pub method_name: String,
    /// Signal category.
    pub category: MethodCategory,
    /// Authenticity score, 1.0 = fully authentic-looking.
    pub score: f64,
    /// The method's confidence in its own score.
    pub confidence: f64,
    /// Free-text rationale.
    pub details: String,
}

impl DetectionMethodOutput {
    /// Creates a new output. Values are stored as given; see [`Self::sanitized`].
    pub fn new(
        method_name: impl Into<String>,
        category: MethodCategory,
        score: f64,
        confidence: f64,
        details: impl Into<String>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            category,
            score,
            confidence,
            details: details.into(),
        }
    }

    /// Zero-score, zero-confidence marker recorded when a method fails.
    pub fn failure_marker(
        method_name: impl Into<String>,
        category: MethodCategory,
        reason: &str,
    ) -> Self {
        Self::new(
            method_name,
            category,
            0.0,
            0.0,
            format!("detection failed: {reason}"),
        )
    }

    /// Clamps `score` and `confidence` into `[0, 1]` and fills empty details.
    ///
    /// Returns the repaired output and one [`InvalidScoreRange`] per field
    /// that had to be clamped. NaN is treated as 0.
    #[must_use]
    pub fn sanitized(mut self) -> (Self, Vec<InvalidScoreRange>) {
        let mut violations = Vec::new();

        if let Some(fixed) = clamp_unit(self.score) {
            violations.push(InvalidScoreRange {
                method: self.method_name.clone(),
                field: "score",
                value: self.score,
            });
            self.score = fixed;
        }
        if let Some(fixed) = clamp_unit(self.confidence) {
            violations.push(InvalidScoreRange {
                method: self.method_name.clone(),
                field: "confidence",
                value: self.confidence,
            });
            self.confidence = fixed;
        }
        if self.details.trim().is_empty() {
            self.details = format!("{} reported no details", self.method_name);
        }

        (self, violations)
    }
}

/// Returns the clamped value when `value` lies outside `[0, 1]`.
fn clamp_unit(value: f64) -> Option<f64> {
    if value.is_nan() {
        Some(0.0)
    } else if (0.0..=1.0).contains(&value) {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}
