//! Media item types supplied by intake.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The kind of media being analyzed. Fixed at intake.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Audio recording.
    Audio,
}

impl MediaKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Image, Self::Video, Self::Audio];

    /// Lowercase identifier used in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the media bytes live. Exactly one of a local file or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaLocation {
    /// A file on the local filesystem.
    Local {
        /// Path to the file.
        path: PathBuf,
    },
    /// Media referenced by URL.
    Remote {
        /// The URL as supplied.
        url: String,
    },
}

/// Structural facts an intake may have measured.
///
/// Anything left unset falls back to kind defaults during metadata synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProbe {
    /// Container or codec name, e.g. `"PNG"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Frame width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Frame height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Playback length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Whether recompression artifacts were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_artifacts: Option<bool>,
    /// Whether a valid content signature is embedded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<bool>,
}

/// A unit of input media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Identifier assigned at intake.
    pub id: Uuid,
    /// Display name (file name or URL tail).
    pub name: String,
    /// Media kind.
    pub kind: MediaKind,
    /// Size in bytes, `0` when unknown.
    pub size_bytes: u64,
    /// Local file or remote URL.
    pub source: MediaLocation,
    /// Intake timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optional measured attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<MediaProbe>,
}

impl MediaItem {
    /// Creates a media item with a fresh id and the current time.
    pub fn new(
        name: impl Into<String>,
        kind: MediaKind,
        size_bytes: u64,
        source: MediaLocation,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            size_bytes,
            source,
            created_at: OffsetDateTime::now_utc(),
            probe: None,
        }
    }

    /// Attaches measured attributes.
    #[must_use]
    pub fn with_probe(mut self, probe: MediaProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Returns true when the media is referenced by URL.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.source, MediaLocation::Remote { .. })
    }
}
