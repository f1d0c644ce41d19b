//! Veracity Core - Media trust analysis domain logic
//!
//! This crate contains the domain types, the detection method trait, the
//! placeholder detection methods, and the runner/aggregator/batch pipeline
//! that turns media items into trust verdicts.

pub mod aggregator;
pub mod batch;
pub mod domain;
pub mod error;
pub mod methods;
pub mod ports;
pub mod runner;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use batch::{
    BatchConfig, BatchCoordinator, BatchReport, BatchSlot, CancellationToken, ITEM_CHECKPOINTS,
};
pub use domain::{
    AnalysisResult, DetectionMethod, DetectionMethodOutput, MediaItem, MediaKind, MediaLocation,
    MediaMetadata, MediaProbe, MethodCategory, Resolution,
};
pub use error::{AnalysisError, DetectionFailure, InvalidScoreRange};
pub use methods::{standard_methods, MethodSelection};
pub use ports::{MediaSource, ProgressEvent, ProgressSink, ResultOutput};
pub use runner::{DetectionRunner, RunnerConfig};
