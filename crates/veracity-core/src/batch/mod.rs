//! Batch coordination: runs the detection pipeline over many media items.
//!
//! With one worker (the default) items are analyzed strictly one after the
//! other. With more workers items run on a bounded rayon pool and finished
//! slots are buffered until every earlier slot is released, so results and
//! terminal progress events always follow input order.

mod cancel;
mod progress;

use std::collections::BTreeMap;
use std::sync::mpsc;

use tracing::{debug, info, warn};
use uuid::Uuid;

pub use cancel::CancellationToken;
pub use progress::{batch_percent, MethodPhase, ITEM_CHECKPOINTS};

use crate::aggregator::Aggregator;
use crate::domain::{AnalysisResult, MediaItem};
use crate::error::AnalysisError;
use crate::ports::{ProgressEvent, ProgressSink, ResultOutput};
use crate::runner::DetectionRunner;

/// Configuration for batch runs.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Number of items analyzed concurrently. `1` is strictly sequential.
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Outcome for one input item.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchSlot {
    /// The item was fully analyzed.
    Completed(AnalysisResult),
    /// The item's analysis failed; no result exists.
    Failed {
        /// Id of the media item.
        media_id: Uuid,
        /// Why the analysis failed.
        reason: String,
    },
    /// The item was not analyzed because the run was cancelled.
    Cancelled {
        /// Id of the media item.
        media_id: Uuid,
    },
}

impl BatchSlot {
    /// Returns the result if the item completed.
    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Slots for a whole batch, one per input item, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    slots: Vec<BatchSlot>,
}

impl BatchReport {
    /// All slots in input order.
    #[must_use]
    pub fn slots(&self) -> &[BatchSlot] {
        &self.slots
    }

    /// Consumes the report, returning its slots.
    #[must_use]
    pub fn into_slots(self) -> Vec<BatchSlot> {
        self.slots
    }

    /// Completed results in input order.
    pub fn results(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.slots.iter().filter_map(BatchSlot::result)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the batch had no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of completed items.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.results().count()
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, BatchSlot::Failed { .. }))
            .count()
    }

    /// Number of cancelled items.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, BatchSlot::Cancelled { .. }))
            .count()
    }
}

/// Drives runner and aggregator over a batch of media items.
pub struct BatchCoordinator {
    runner: DetectionRunner,
    aggregator: Aggregator,
    config: BatchConfig,
}

impl BatchCoordinator {
    /// Creates a new coordinator.
    #[must_use]
    pub const fn new(runner: DetectionRunner, aggregator: Aggregator, config: BatchConfig) -> Self {
        Self {
            runner,
            aggregator,
            config,
        }
    }

    /// Returns the detection runner.
    #[must_use]
    pub const fn runner(&self) -> &DetectionRunner {
        &self.runner
    }

    /// Returns the aggregator.
    #[must_use]
    pub const fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Returns the batch configuration.
    #[must_use]
    pub const fn config(&self) -> BatchConfig {
        self.config
    }

    /// Analyzes a single media item outside any batch.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyMethodSet`] if no method applies to the item.
    pub fn analyze_item(&self, media: &MediaItem) -> Result<AnalysisResult, AnalysisError> {
        self.aggregator.aggregate(media, self.runner.run(media))
    }

    /// Analyzes every item, reporting progress to `sink`.
    pub fn run(
        &self,
        items: &[MediaItem],
        sink: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> BatchReport {
        self.run_inner(items, sink, token, &mut |_, _| {})
    }

    /// Analyzes every item and writes each completed result to `output` as
    /// soon as it is released in input order.
    ///
    /// A failed write stops further writes; the batch itself still runs to
    /// the end so the report stays aligned with the input.
    ///
    /// # Errors
    ///
    /// Returns the first write or flush error.
    pub fn run_with_output(
        &self,
        items: &[MediaItem],
        sink: &dyn ProgressSink,
        output: &dyn ResultOutput,
        token: &CancellationToken,
    ) -> anyhow::Result<BatchReport> {
        let mut write_error: Option<anyhow::Error> = None;

        let report = self.run_inner(items, sink, token, &mut |media, slot| {
            if write_error.is_some() {
                return;
            }
            if let BatchSlot::Completed(result) = slot {
                if let Err(e) = output.write(media, result) {
                    warn!("Failed to write result for {}: {e:#}", media.name);
                    write_error = Some(e);
                }
            }
        });

        if let Some(e) = write_error {
            return Err(e);
        }
        output.flush()?;
        Ok(report)
    }

    fn run_inner(
        &self,
        items: &[MediaItem],
        sink: &dyn ProgressSink,
        token: &CancellationToken,
        on_release: &mut dyn FnMut(&MediaItem, &BatchSlot),
    ) -> BatchReport {
        let total = items.len();
        let workers = self.config.workers.max(1);
        info!("Analyzing {total} media items with {workers} worker(s)");

        let mut releaser = Releaser {
            items,
            sink,
            on_release,
            slots: Vec::with_capacity(total),
        };

        if total == 0 {
            sink.on_event(ProgressEvent::BatchProgress { percent: 100 });
        } else if workers == 1 || total == 1 {
            for (index, item) in items.iter().enumerate() {
                let slot = self.analyze_slot(index, item, total, sink, token);
                releaser.release(slot);
            }
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => self.run_pooled(&pool, items, sink, token, &mut releaser),
                Err(e) => {
                    warn!("Failed to build worker pool, running sequentially: {e}");
                    for (index, item) in items.iter().enumerate() {
                        let slot = self.analyze_slot(index, item, total, sink, token);
                        releaser.release(slot);
                    }
                }
            }
        }

        let report = BatchReport {
            slots: releaser.slots,
        };
        sink.on_event(ProgressEvent::Finished {
            completed: report.completed(),
            failed: report.failed(),
            cancelled: report.cancelled(),
        });
        report
    }

    /// Runs items on `pool`, releasing finished slots in input order.
    fn run_pooled(
        &self,
        pool: &rayon::ThreadPool,
        items: &[MediaItem],
        sink: &dyn ProgressSink,
        token: &CancellationToken,
        releaser: &mut Releaser<'_>,
    ) {
        let total = items.len();
        let (tx, rx) = mpsc::channel::<(usize, BatchSlot)>();

        std::thread::scope(|scope| {
            scope.spawn(move || {
                pool.scope(|tasks| {
                    for (index, item) in items.iter().enumerate() {
                        let tx = tx.clone();
                        tasks.spawn(move |_| {
                            let slot = self.analyze_slot(index, item, total, sink, token);
                            if tx.send((index, slot)).is_err() {
                                debug!("Batch receiver gone, dropping slot {index}");
                            }
                        });
                    }
                });
            });

            let mut pending = BTreeMap::new();
            for (index, slot) in rx {
                pending.insert(index, slot);
                while let Some(slot) = pending.remove(&releaser.slots.len()) {
                    releaser.release(slot);
                }
            }
        });
    }

    /// Analyzes one item. Never returns a partially filled result.
    fn analyze_slot(
        &self,
        index: usize,
        item: &MediaItem,
        total: usize,
        sink: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> BatchSlot {
        if token.is_cancelled() {
            return BatchSlot::Cancelled { media_id: item.id };
        }

        sink.on_event(ProgressEvent::Started {
            index,
            media_id: item.id,
            name: item.name.clone(),
            total,
        });
        checkpoint(sink, index, ITEM_CHECKPOINTS[0]);

        let mut phase = MethodPhase::default();
        let mut on_progress = |done: usize, methods: usize| {
            for percent in phase.advance(done, methods) {
                checkpoint(sink, index, percent);
            }
        };

        let outputs = match self.runner.run_observed(item, token, &mut on_progress) {
            Ok(outputs) => outputs,
            Err(AnalysisError::Cancelled) => {
                debug!("Cancelled mid-analysis: {}", item.name);
                return BatchSlot::Cancelled { media_id: item.id };
            }
            Err(e) => {
                return BatchSlot::Failed {
                    media_id: item.id,
                    reason: e.to_string(),
                };
            }
        };

        for percent in phase.advance(outputs.len(), outputs.len()) {
            checkpoint(sink, index, percent);
        }
        checkpoint(sink, index, ITEM_CHECKPOINTS[4]);

        match self.aggregator.aggregate(item, outputs) {
            Ok(result) => {
                checkpoint(sink, index, ITEM_CHECKPOINTS[5]);
                BatchSlot::Completed(result)
            }
            Err(e) => {
                warn!("Analysis failed for {}: {e}", item.name);
                BatchSlot::Failed {
                    media_id: item.id,
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn checkpoint(sink: &dyn ProgressSink, index: usize, percent: u8) {
    sink.on_event(ProgressEvent::Checkpoint { index, percent });
}

/// Emits terminal events for slots handed over in input order.
struct Releaser<'a> {
    items: &'a [MediaItem],
    sink: &'a dyn ProgressSink,
    on_release: &'a mut dyn FnMut(&MediaItem, &BatchSlot),
    slots: Vec<BatchSlot>,
}

impl Releaser<'_> {
    fn release(&mut self, slot: BatchSlot) {
        let index = self.slots.len();
        let event = match &slot {
            BatchSlot::Completed(result) => ProgressEvent::Completed {
                index,
                result: result.clone(),
            },
            BatchSlot::Failed { media_id, reason } => ProgressEvent::Failed {
                index,
                media_id: *media_id,
                reason: reason.clone(),
            },
            BatchSlot::Cancelled { media_id } => ProgressEvent::Cancelled {
                index,
                media_id: *media_id,
            },
        };
        self.sink.on_event(event);
        (self.on_release)(&self.items[index], &slot);

        self.slots.push(slot);
        self.sink.on_event(ProgressEvent::BatchProgress {
            percent: batch_percent(self.slots.len(), self.items.len()),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use super::*;
    use crate::domain::{
        DetectionMethod, DetectionMethodOutput, MediaKind, MediaLocation, MethodCategory,
    };
    use crate::error::DetectionFailure;
    use crate::runner::RunnerConfig;

    struct Constant(f64);

    impl DetectionMethod for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn category(&self) -> MethodCategory {
            MethodCategory::Visual
        }

        fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
            Ok(DetectionMethodOutput::new(
                "constant",
                MethodCategory::Visual,
                self.0,
                1.0,
                "fixed",
            ))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ProgressEvent>>);

    impl ProgressSink for Recorder {
        fn on_event(&self, event: ProgressEvent) {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }

    impl Recorder {
        fn checkpoints(&self, index: usize) -> Vec<u8> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter_map(|e| match e {
                    ProgressEvent::Checkpoint { index: i, percent } if *i == index => Some(*percent),
                    _ => None,
                })
                .collect()
        }

        fn batch_progress(&self) -> Vec<u8> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter_map(|e| match e {
                    ProgressEvent::BatchProgress { percent } => Some(*percent),
                    _ => None,
                })
                .collect()
        }
    }

    fn coordinator(methods: Vec<Box<dyn DetectionMethod>>, workers: usize) -> BatchCoordinator {
        BatchCoordinator::new(
            DetectionRunner::new(methods, RunnerConfig::default()).unwrap(),
            Aggregator::default(),
            BatchConfig { workers },
        )
    }

    fn items(n: usize) -> Vec<MediaItem> {
        (0..n)
            .map(|i| {
                MediaItem::new(
                    format!("item-{i}"),
                    MediaKind::Image,
                    0,
                    MediaLocation::Local {
                        path: format!("item-{i}.jpg").into(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_default_is_sequential() {
        assert_eq!(BatchConfig::default().workers, 1);
    }

    #[test]
    fn test_item_checkpoints_in_order() {
        let sink = Recorder::default();
        let batch = items(1);
        coordinator(vec![Box::new(Constant(0.9))], 1).run(
            &batch,
            &sink,
            &CancellationToken::new(),
        );
        assert_eq!(sink.checkpoints(0), ITEM_CHECKPOINTS);
    }

    #[test]
    fn test_batch_progress_sequence() {
        let sink = Recorder::default();
        let batch = items(4);
        let report = coordinator(vec![Box::new(Constant(1.0))], 1).run(
            &batch,
            &sink,
            &CancellationToken::new(),
        );
        assert_eq!(report.len(), 4);
        assert_eq!(sink.batch_progress(), [25, 50, 75, 100]);
    }

    #[test]
    fn test_empty_batch_reports_complete() {
        let sink = Recorder::default();
        let report = coordinator(vec![Box::new(Constant(1.0))], 1).run(
            &[],
            &sink,
            &CancellationToken::new(),
        );
        assert!(report.is_empty());
        assert_eq!(sink.batch_progress(), [100]);
    }

    #[test]
    fn test_no_methods_fails_each_slot() {
        let sink = Recorder::default();
        let batch = items(2);
        let report = coordinator(Vec::new(), 1).run(&batch, &sink, &CancellationToken::new());
        assert_eq!(report.failed(), 2);
        match &report.slots()[0] {
            BatchSlot::Failed { media_id, reason } => {
                assert_eq!(*media_id, batch[0].id);
                assert_eq!(reason, &AnalysisError::EmptyMethodSet.to_string());
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(sink.batch_progress().last(), Some(&100));
    }

    #[test]
    fn test_pre_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let batch = items(3);
        let report = coordinator(vec![Box::new(Constant(1.0))], 1).run(&batch, &(), &token);
        assert_eq!(report.cancelled(), 3);
        assert_eq!(report.completed(), 0);
    }

    #[test]
    fn test_analyze_item() {
        let batch = items(1);
        let result = coordinator(vec![Box::new(Constant(0.3))], 1)
            .analyze_item(&batch[0])
            .unwrap();
        assert_eq!(result.trust_score(), 30);
        assert!(!result.is_authentic());
    }

    #[test]
    fn test_pooled_run_keeps_input_order() {
        let sink = Recorder::default();
        let batch = items(12);
        let report = coordinator(vec![Box::new(Constant(0.8))], 4).run(
            &batch,
            &sink,
            &CancellationToken::new(),
        );

        let ids: Vec<_> = report.results().map(AnalysisResult::media_id).collect();
        let expected: Vec<_> = batch.iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);

        let progress = sink.batch_progress();
        assert_eq!(progress.len(), 12);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&100));
    }
}
