//! Core domain types for media trust analysis.

mod detector;
mod media;
mod method;
mod result;

pub use detector::DetectionMethod;
pub use media::{MediaItem, MediaKind, MediaLocation, MediaProbe};
pub use method::{DetectionMethodOutput, MethodCategory};
pub(crate) use result::ResultParts;
pub use result::{AnalysisResult, MediaMetadata, Resolution};
