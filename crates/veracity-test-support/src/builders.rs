//! Media item builders and scripted detection methods for testing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use veracity_core::batch::CancellationToken;
use veracity_core::domain::{
    DetectionMethod, DetectionMethodOutput, MediaItem, MediaKind, MediaLocation, MediaProbe,
    MethodCategory,
};
use veracity_core::error::DetectionFailure;

/// Boxes a method for a runner's method list.
#[must_use]
pub fn boxed(method: impl DetectionMethod + 'static) -> Box<dyn DetectionMethod> {
    Box::new(method)
}

/// Builder for [`MediaItem`]s with sensible test defaults.
///
/// Items default to a local file named after the item, zero size and no probe.
pub struct MediaItemBuilder {
    name: String,
    kind: MediaKind,
    size_bytes: u64,
    source: Option<MediaLocation>,
    probe: Option<MediaProbe>,
}

impl MediaItemBuilder {
    /// Starts a builder for `kind`.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            size_bytes: 0,
            source: None,
            probe: None,
        }
    }

    /// Starts an image item.
    #[must_use]
    pub fn image(name: impl Into<String>) -> Self {
        Self::new(name, MediaKind::Image)
    }

    /// Starts a video item.
    #[must_use]
    pub fn video(name: impl Into<String>) -> Self {
        Self::new(name, MediaKind::Video)
    }

    /// Starts an audio item.
    #[must_use]
    pub fn audio(name: impl Into<String>) -> Self {
        Self::new(name, MediaKind::Audio)
    }

    /// Sets the size in bytes.
    #[must_use]
    pub fn size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Points the item at a local path.
    #[must_use]
    pub fn local(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(MediaLocation::Local { path: path.into() });
        self
    }

    /// Points the item at a URL.
    #[must_use]
    pub fn remote(mut self, url: impl Into<String>) -> Self {
        self.source = Some(MediaLocation::Remote { url: url.into() });
        self
    }

    /// Attaches measured attributes.
    #[must_use]
    pub fn probe(mut self, probe: MediaProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Builds the item with a fresh id.
    #[must_use]
    pub fn build(self) -> MediaItem {
        let source = self.source.unwrap_or_else(|| MediaLocation::Local {
            path: PathBuf::from(&self.name),
        });
        let item = MediaItem::new(self.name, self.kind, self.size_bytes, source);
        match self.probe {
            Some(probe) => item.with_probe(probe),
            None => item,
        }
    }

    /// Builds `count` items named `{prefix}-{i}`.
    #[must_use]
    pub fn batch(prefix: &str, kind: MediaKind, count: usize) -> Vec<MediaItem> {
        (0..count)
            .map(|i| Self::new(format!("{prefix}-{i}"), kind).build())
            .collect()
    }
}

/// Reports the same score for every item.
pub struct FixedScoreMethod {
    name: String,
    category: MethodCategory,
    score: f64,
    confidence: f64,
    only_kind: Option<MediaKind>,
    delay: Option<(String, Duration)>,
}

impl FixedScoreMethod {
    /// Creates a visual method that always reports `score` with full confidence.
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            category: MethodCategory::Visual,
            score,
            confidence: 1.0,
            only_kind: None,
            delay: None,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: MethodCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the reported confidence.
    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Restricts the method to `kind`.
    #[must_use]
    pub fn only_for(mut self, kind: MediaKind) -> Self {
        self.only_kind = Some(kind);
        self
    }

    /// Sleeps for `delay` before answering for the item named `media_name`.
    #[must_use]
    pub fn slow_on(mut self, media_name: impl Into<String>, delay: Duration) -> Self {
        self.delay = Some((media_name.into(), delay));
        self
    }
}

impl DetectionMethod for FixedScoreMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> MethodCategory {
        self.category
    }

    fn applies_to(&self, kind: MediaKind) -> bool {
        self.only_kind.map_or(true, |only| only == kind)
    }

    fn detect(&self, media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
        if let Some((name, delay)) = &self.delay {
            if *name == media.name {
                std::thread::sleep(*delay);
            }
        }
        Ok(DetectionMethodOutput::new(
            &self.name,
            self.category,
            self.score,
            self.confidence,
            "fixed score",
        ))
    }
}

/// Always fails with the given reason.
pub struct FailingMethod {
    name: String,
    reason: String,
}

impl FailingMethod {
    /// Creates a method that fails every evaluation.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl DetectionMethod for FailingMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> MethodCategory {
        MethodCategory::Metadata
    }

    fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
        Err(DetectionFailure::new(&self.name, &self.reason))
    }
}

/// Reports raw values without any range checking, including NaN.
pub struct OutOfRangeMethod {
    name: String,
    score: f64,
    confidence: f64,
}

impl OutOfRangeMethod {
    /// Creates a method reporting `score` and `confidence` verbatim.
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            score,
            confidence,
        }
    }
}

impl DetectionMethod for OutOfRangeMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> MethodCategory {
        MethodCategory::Temporal
    }

    fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
        Ok(DetectionMethodOutput::new(
            &self.name,
            MethodCategory::Temporal,
            self.score,
            self.confidence,
            "",
        ))
    }
}

/// Cancels a token from inside a detection call.
///
/// Answers normally until it has been invoked `after` times, then cancels
/// the token on the next invocation.
pub struct CancellingMethod {
    token: CancellationToken,
    after: usize,
    calls: AtomicUsize,
}

impl CancellingMethod {
    /// Creates a method that cancels `token` on call number `after + 1`.
    #[must_use]
    pub const fn new(token: CancellationToken, after: usize) -> Self {
        Self {
            token,
            after,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `detect` ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DetectionMethod for CancellingMethod {
    fn name(&self) -> &str {
        "cancelling"
    }

    fn category(&self) -> MethodCategory {
        MethodCategory::Visual
    }

    fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.after {
            self.token.cancel();
        }
        Ok(DetectionMethodOutput::new(
            "cancelling",
            MethodCategory::Visual,
            1.0,
            1.0,
            "answered before cancelling",
        ))
    }
}
