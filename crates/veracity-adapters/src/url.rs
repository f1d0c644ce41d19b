//! Intake for media referenced by URL.
//!
//! Nothing is downloaded: the kind is inferred from the URL text and the size
//! is unknown.

use veracity_core::{MediaItem, MediaKind, MediaLocation};

/// Name used when a URL has no usable tail.
pub const FALLBACK_NAME: &str = "media-file";

/// Whether `input` is an http(s) URL rather than a path.
#[must_use]
pub fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Builds a media item for `url`.
#[must_use]
pub fn media_from_url(url: &str) -> MediaItem {
    MediaItem::new(
        name_from_url(url),
        kind_from_url(url),
        0,
        MediaLocation::Remote {
            url: url.to_string(),
        },
    )
}

/// `video` anywhere in the URL wins over `audio`; everything else is an image.
fn kind_from_url(url: &str) -> MediaKind {
    if url.contains("video") {
        MediaKind::Video
    } else if url.contains("audio") {
        MediaKind::Audio
    } else {
        MediaKind::Image
    }
}

fn name_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|tail| !tail.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.jpg"));
        assert!(is_url("HTTP://example.com"));
        assert!(!is_url("./https/a.jpg"));
        assert!(!is_url("ftp://example.com/a.jpg"));
    }

    #[test]
    fn test_kind_from_url() {
        assert_eq!(
            kind_from_url("https://cdn.example.com/video/clip"),
            MediaKind::Video
        );
        assert_eq!(
            kind_from_url("https://example.com/audio/take.bin"),
            MediaKind::Audio
        );
        assert_eq!(
            kind_from_url("https://example.com/video-audio"),
            MediaKind::Video
        );
        assert_eq!(kind_from_url("https://example.com/photo.png"), MediaKind::Image);
    }

    #[test]
    fn test_name_from_url() {
        assert_eq!(name_from_url("https://example.com/media/clip.mp4"), "clip.mp4");
        assert_eq!(name_from_url("https://example.com/media/"), FALLBACK_NAME);
    }

    #[test]
    fn test_media_from_url() {
        let item = media_from_url("https://example.com/audio/voice.ogg");
        assert_eq!(item.kind, MediaKind::Audio);
        assert_eq!(item.name, "voice.ogg");
        assert_eq!(item.size_bytes, 0);
        assert!(item.is_remote());
    }
}
