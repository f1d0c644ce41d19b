//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the analysis core and external adapters.

mod media_source;
mod progress;
mod result_output;

pub use media_source::MediaSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
