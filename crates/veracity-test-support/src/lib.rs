//! Test support utilities for veracity.
//!
//! Provides port mocks, media item builders, and scripted detection methods
//! for testing the analysis pipeline.
//!
//! # Example
//!
//! ```
//! use veracity_test_support::{FixedScoreMethod, MediaItemBuilder, MockMediaSource};
//!
//! let clip = MediaItemBuilder::video("clip.mp4").size(2048).build();
//! let source = MockMediaSource::new(vec![clip]);
//! let method = FixedScoreMethod::new("always-fine", 0.9);
//! ```

mod builders;
mod mocks;

pub use builders::{
    boxed, CancellingMethod, FailingMethod, FixedScoreMethod, MediaItemBuilder, OutOfRangeMethod,
};
pub use mocks::{MockMediaSource, MockProgressSink, MockResultOutput};
