//! Output formatting for CLI.

mod csv;
mod json;
mod progress;

pub use csv::CsvOutput;
pub use json::{JsonLayout, JsonOutput};
pub use progress::ProgressBar;

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex, PoisonError};

    use veracity_core::{
        Aggregator, AnalysisResult, DetectionMethodOutput, MediaItem, MediaKind, MediaLocation,
        MethodCategory,
    };

    /// In-memory writer whose contents stay readable after being boxed.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap_or_else(PoisonError::into_inner))
                .into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A media item and its result from a single method reporting `score`.
    #[allow(clippy::unwrap_used)]
    pub fn analyzed(name: &str, score: f64) -> (MediaItem, AnalysisResult) {
        let media = MediaItem::new(
            name,
            MediaKind::Image,
            100,
            MediaLocation::Local { path: name.into() },
        );
        let output = DetectionMethodOutput::new("fixed", MethodCategory::Visual, score, 1.0, "fixed");
        let result = Aggregator::default().aggregate(&media, vec![output]).unwrap();
        (media, result)
    }
}
