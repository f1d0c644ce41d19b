//! Aggregation of method outputs into a trust verdict.
//!
//! The baseline policy is an unweighted mean of method scores: every method
//! contributes equally regardless of its own confidence.

use tracing::{debug, warn};

use crate::domain::{
    AnalysisResult, DetectionMethodOutput, MediaItem, MediaKind, MediaMetadata, Resolution,
    ResultParts,
};
use crate::error::AnalysisError;

/// Explanation used when the media is judged authentic.
pub const AUTHENTIC_EXPLANATION: &str = "Our AI analysis indicates this media appears to be \
authentic based on multiple detection methods including facial landmark consistency, temporal \
coherence, and metadata validation.";

/// Explanation used when manipulation is suspected.
pub const SUSPICIOUS_EXPLANATION: &str = "Our AI analysis has detected potential signs of \
manipulation. This could indicate the presence of deepfake technology or other digital \
alterations.";

/// Standard warnings attached to every non-authentic verdict, in order.
pub const STANDARD_WARNINGS: [&str; 3] = [
    "Potential AI-generated content detected",
    "Unusual compression patterns found",
    "Temporal inconsistencies identified",
];

/// Frame size assumed when no probe measured one.
pub const DEFAULT_RESOLUTION: Resolution = Resolution::new(1920, 1080);

/// Duration assumed when no probe measured one.
pub const DEFAULT_DURATION_SECS: f64 = 45.0;

/// Configuration for aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Trust scores strictly above this are authentic.
    pub authenticity_threshold: u8,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            authenticity_threshold: 60,
        }
    }
}

/// Turns an ordered list of method outputs into an [`AnalysisResult`].
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Creates a new aggregator with the given configuration.
    #[must_use]
    pub const fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Returns the aggregator configuration.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregates method outputs for `media`.
    ///
    /// Outputs are sanitized first, so scores outside `[0, 1]` are clamped
    /// (NaN counts as 0) before they reach the verdict.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyMethodSet`] when `methods` is empty.
    pub fn aggregate(
        &self,
        media: &MediaItem,
        methods: Vec<DetectionMethodOutput>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if methods.is_empty() {
            return Err(AnalysisError::EmptyMethodSet);
        }

        let methods: Vec<_> = methods
            .into_iter()
            .map(|output| {
                let (output, violations) = output.sanitized();
                for violation in violations {
                    warn!("Clamped output for {}: {violation}", media.name);
                }
                output
            })
            .collect();

        let avg_score = mean_score(&methods);
        let trust_score = percent(avg_score);
        let is_authentic = trust_score > self.config.authenticity_threshold;
        // Numerically identical to the trust score under the unweighted policy.
        let confidence = percent(avg_score);

        debug!(
            "Aggregated {} methods for {}: trust {trust_score}, authentic {is_authentic}",
            methods.len(),
            media.name
        );

        let (explanation, warnings) = if is_authentic {
            (AUTHENTIC_EXPLANATION, Vec::new())
        } else {
            (
                SUSPICIOUS_EXPLANATION,
                STANDARD_WARNINGS.iter().map(|w| (*w).to_string()).collect(),
            )
        };

        Ok(AnalysisResult::from_parts(ResultParts {
            media_id: media.id,
            trust_score,
            is_authentic,
            confidence,
            methods,
            metadata: synthesize_metadata(media),
            explanation: explanation.to_string(),
            warnings,
        }))
    }
}

/// Unweighted arithmetic mean of method scores.
#[allow(clippy::cast_precision_loss)]
fn mean_score(methods: &[DetectionMethodOutput]) -> f64 {
    methods.iter().map(|m| m.score).sum::<f64>() / methods.len() as f64
}

/// Maps a unit score to a rounded percentage in `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(unit: f64) -> u8 {
    (unit * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Builds metadata from probe values, falling back to kind defaults.
fn synthesize_metadata(media: &MediaItem) -> MediaMetadata {
    let probe = media.probe.clone().unwrap_or_default();

    let format = probe.format.unwrap_or_else(|| {
        match media.kind {
            MediaKind::Image => "JPEG",
            MediaKind::Video => "MP4",
            MediaKind::Audio => "WAV",
        }
        .to_string()
    });

    let resolution = (media.kind != MediaKind::Audio).then(|| match (probe.width, probe.height) {
        (Some(width), Some(height)) => Resolution::new(width, height),
        _ => DEFAULT_RESOLUTION,
    });

    let duration_secs = (media.kind != MediaKind::Image)
        .then(|| probe.duration_secs.unwrap_or(DEFAULT_DURATION_SECS));

    MediaMetadata {
        format,
        file_size: media.size_bytes,
        resolution,
        duration_secs,
        compression_artifacts: probe.compression_artifacts,
        digital_signature: probe.digital_signature,
    }
}
