//! Filesystem adapter for local media files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mime_guess::mime;
use tracing::warn;
use veracity_core::{MediaItem, MediaKind, MediaLocation};

/// Infers the media kind from the MIME type guessed for `path`'s extension.
#[must_use]
pub fn kind_for_path(path: &Path) -> Option<MediaKind> {
    let guess = mime_guess::from_path(path).first()?;
    let top = guess.type_();
    if top == mime::IMAGE {
        Some(MediaKind::Image)
    } else if top == mime::VIDEO {
        Some(MediaKind::Video)
    } else if top == mime::AUDIO {
        Some(MediaKind::Audio)
    } else {
        None
    }
}

/// Builds a media item for a local file.
///
/// # Errors
///
/// Returns an error if the file cannot be inspected or is not image, video
/// or audio media.
pub fn media_from_path(path: &Path) -> Result<MediaItem> {
    let kind = kind_for_path(path)
        .with_context(|| format!("Unsupported media type: {}", path.display()))?;
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    let name = path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    );

    Ok(MediaItem::new(
        name,
        kind,
        metadata.len(),
        MediaLocation::Local {
            path: path.to_path_buf(),
        },
    ))
}

/// Collects supported media files below `dir` in name order.
pub(crate) fn collect_from_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };

    let mut paths: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_file() && kind_for_path(&path).is_some() {
            files.push(path);
        } else if path.is_dir() && recursive {
            collect_from_dir(&path, recursive, files);
        }
    }
}
