//! Analysis result types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::DetectionMethodOutput;

/// Complete, immutable analysis record for a single media item.
///
/// Only the [`Aggregator`](crate::Aggregator) creates these; every derived
/// field is read through an accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    id: Uuid,
    media_id: Uuid,
    trust_score: u8,
    is_authentic: bool,
    confidence: u8,
    methods: Vec<DetectionMethodOutput>,
    metadata: MediaMetadata,
    explanation: String,
    warnings: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    analyzed_at: OffsetDateTime,
}

/// Field values assembled by the aggregator.
pub(crate) struct ResultParts {
    pub media_id: Uuid,
    pub trust_score: u8,
    pub is_authentic: bool,
    pub confidence: u8,
    pub methods: Vec<DetectionMethodOutput>,
    pub metadata: MediaMetadata,
    pub explanation: String,
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    pub(crate) fn from_parts(parts: ResultParts) -> Self {
        Self {
            id: Uuid::new_v4(),
            media_id: parts.media_id,
            trust_score: parts.trust_score,
            is_authentic: parts.is_authentic,
            confidence: parts.confidence,
            methods: parts.methods,
            metadata: parts.metadata,
            explanation: parts.explanation,
            warnings: parts.warnings,
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }

    /// Unique result identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Id of the analyzed media item.
    #[must_use]
    pub const fn media_id(&self) -> Uuid {
        self.media_id
    }

    /// Trust score in `0..=100`.
    #[must_use]
    pub const fn trust_score(&self) -> u8 {
        self.trust_score
    }

    /// Authenticity verdict.
    #[must_use]
    pub const fn is_authentic(&self) -> bool {
        self.is_authentic
    }

    /// Aggregate confidence in `0..=100`.
    #[must_use]
    pub const fn confidence(&self) -> u8 {
        self.confidence
    }

    /// Method outputs in invocation order.
    #[must_use]
    pub fn methods(&self) -> &[DetectionMethodOutput] {
        &self.methods
    }

    /// Structural facts about the media.
    #[must_use]
    pub const fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }

    /// Natural-language summary.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Warnings, empty when authentic.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Completion timestamp.
    #[must_use]
    pub const fn analyzed_at(&self) -> OffsetDateTime {
        self.analyzed_at
    }
}

/// Informational facts about the analyzed media. Not used in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// Container format name.
    pub format: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Frame size; absent for audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Length in seconds; absent for images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Recompression artifacts found; only known from a probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_artifacts: Option<bool>,
    /// Embedded signature verified; only known from a probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<bool>,
}

/// Frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
