//! Mixed intake of files, directories and URLs.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use tracing::debug;
use veracity_core::{MediaItem, MediaSource};

use crate::fs::{collect_from_dir, kind_for_path, media_from_path};
use crate::url::{is_url, media_from_url};

/// One resolved intake entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Url(String),
    File(PathBuf),
    Unsupported(PathBuf),
    Missing(PathBuf),
}

/// Media source over command-line style inputs.
///
/// Each input is an http(s) URL, a media file, or a directory scanned for
/// media files. Items keep the order of the inputs; directory contents are
/// sorted by path. Inputs are resolved once, on first use.
pub struct MediaIntake {
    inputs: Vec<String>,
    recursive: bool,
    entries: OnceLock<Vec<Entry>>,
}

impl MediaIntake {
    /// Creates a new intake.
    ///
    /// # Arguments
    ///
    /// * `inputs` - URLs, files or directories
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(inputs: Vec<String>, recursive: bool) -> Self {
        Self {
            inputs,
            recursive,
            entries: OnceLock::new(),
        }
    }

    fn entries(&self) -> &[Entry] {
        self.entries.get_or_init(|| {
            let entries = self.resolve();
            debug!("Resolved {} media inputs", entries.len());
            entries
        })
    }

    fn resolve(&self) -> Vec<Entry> {
        let mut entries = Vec::new();

        for input in &self.inputs {
            if is_url(input) {
                entries.push(Entry::Url(input.clone()));
                continue;
            }

            let path = PathBuf::from(input);
            if path.is_file() {
                if kind_for_path(&path).is_some() {
                    entries.push(Entry::File(path));
                } else {
                    entries.push(Entry::Unsupported(path));
                }
            } else if path.is_dir() {
                let mut files = Vec::new();
                collect_from_dir(&path, self.recursive, &mut files);
                entries.extend(files.into_iter().map(Entry::File));
            } else {
                entries.push(Entry::Missing(path));
            }
        }

        entries
    }
}

impl MediaSource for MediaIntake {
    fn items(&self) -> Box<dyn Iterator<Item = Result<MediaItem>> + Send + '_> {
        Box::new(self.entries().iter().map(|entry| match entry {
            Entry::Url(url) => Ok(media_from_url(url)),
            Entry::File(path) => media_from_path(path),
            Entry::Unsupported(path) => {
                Err(anyhow!("Unsupported media type: {}", path.display()))
            }
            Entry::Missing(path) => Err(anyhow!("Path does not exist: {}", path.display())),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries().len())
    }
}
