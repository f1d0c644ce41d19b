//! Media source port for intake from files, URLs, or other collaborators.

use crate::domain::MediaItem;

/// Port for supplying media items to analyze.
pub trait MediaSource: Send + Sync {
    /// Returns an iterator over media items from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if an input cannot be turned into a media item.
    fn items(&self) -> Box<dyn Iterator<Item = anyhow::Result<MediaItem>> + Send + '_>;

    /// Returns the total number of items, if known.
    fn count_hint(&self) -> Option<usize>;
}
