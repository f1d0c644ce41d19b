//! Progress reporting port for UI integration.

use uuid::Uuid;

use crate::domain::AnalysisResult;

/// Events emitted during a batch run.
///
/// `Started` and `Checkpoint` come from whichever worker analyzes the item;
/// the terminal per-item events and `BatchProgress` are emitted in input order.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Analysis started for an item.
    Started {
        /// Index in the batch (0-based).
        index: usize,
        /// Id of the media item.
        media_id: Uuid,
        /// Display name of the media item.
        name: String,
        /// Total items in the batch.
        total: usize,
    },
    /// An item passed one of the fixed per-item checkpoints.
    Checkpoint {
        /// Index in the batch (0-based).
        index: usize,
        /// Item progress in percent.
        percent: u8,
    },
    /// An item finished with a result.
    Completed {
        /// Index in the batch (0-based).
        index: usize,
        /// The analysis result.
        result: AnalysisResult,
    },
    /// An item could not be analyzed.
    Failed {
        /// Index in the batch (0-based).
        index: usize,
        /// Id of the media item.
        media_id: Uuid,
        /// Reason for the failure.
        reason: String,
    },
    /// An item was not analyzed because the run was cancelled.
    Cancelled {
        /// Index in the batch (0-based).
        index: usize,
        /// Id of the media item.
        media_id: Uuid,
    },
    /// Cumulative batch progress after an item was released.
    BatchProgress {
        /// Batch progress in percent.
        percent: u8,
    },
    /// All items have been processed.
    Finished {
        /// Items with a result.
        completed: usize,
        /// Items that failed.
        failed: usize,
        /// Items skipped by cancellation.
        cancelled: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Sink that drops every event.
impl ProgressSink for () {
    fn on_event(&self, _event: ProgressEvent) {}
}
