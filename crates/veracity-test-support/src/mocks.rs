//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use veracity_core::domain::{AnalysisResult, MediaItem};
use veracity_core::ports::{MediaSource, ProgressEvent, ProgressSink, ResultOutput};

/// Mock implementation of `MediaSource` for testing.
///
/// Yields pre-built media items and tracks iteration for assertions.
pub struct MockMediaSource {
    items: Vec<MediaItem>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockMediaSource {
    /// Creates a new mock source with the given items.
    #[must_use]
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaSource for MockMediaSource {
    fn items(&self) -> Box<dyn Iterator<Item = anyhow::Result<MediaItem>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.items.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures `(media name, result)` pairs for later assertions. Can be told to
/// fail once a number of writes succeeded.
pub struct MockResultOutput {
    written: Arc<Mutex<Vec<(String, AnalysisResult)>>>,
    flush_count: Arc<Mutex<usize>>,
    fail_after: Option<usize>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
            fail_after: None,
        }
    }

    /// Creates a mock whose writes fail after `successes` writes.
    #[must_use]
    pub fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::new()
        }
    }

    /// Returns all captured results.
    #[must_use]
    pub fn results(&self) -> Vec<AnalysisResult> {
        self.lock_written()
            .iter()
            .map(|(_, result)| result.clone())
            .collect()
    }

    /// Returns the media names in write order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock_written()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_written(&self) -> std::sync::MutexGuard<'_, Vec<(String, AnalysisResult)>> {
        self.written.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, media: &MediaItem, result: &AnalysisResult) -> anyhow::Result<()> {
        let mut written = self.lock_written();
        if self.fail_after.is_some_and(|limit| written.len() >= limit) {
            anyhow::bail!("mock output refused {}", media.name);
        }
        written.push((media.name.clone(), result.clone()));
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Failed { .. }))
    }

    /// Returns the number of `Cancelled` events.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Cancelled { .. }))
    }

    /// Checkpoints reported for the item at `index`, in arrival order.
    #[must_use]
    pub fn checkpoints(&self, index: usize) -> Vec<u8> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Checkpoint { index: i, percent } if *i == index => Some(*percent),
                _ => None,
            })
            .collect()
    }

    /// Batch progress values in arrival order.
    #[must_use]
    pub fn batch_progress(&self) -> Vec<u8> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::BatchProgress { percent } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    /// Indices of terminal per-item events, in arrival order.
    #[must_use]
    pub fn terminal_order(&self) -> Vec<usize> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Completed { index, .. }
                | ProgressEvent::Failed { index, .. }
                | ProgressEvent::Cancelled { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Returns whether a `Finished` event was received.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.count(|e| matches!(e, ProgressEvent::Finished { .. })) > 0
    }

    /// Returns `(completed, failed, cancelled)` from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                completed,
                failed,
                cancelled,
            } => Some((*completed, *failed, *cancelled)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
