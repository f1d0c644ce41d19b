//! Detection method implementations.
//!
//! The standard set consists of placeholder methods that sample scores from
//! fixed ranges. Real detectors plug in through the same
//! [`DetectionMethod`] trait.

mod placeholder;

pub use placeholder::{PlaceholderMethod, PlaceholderSampler, ScoreRange};

use crate::domain::{DetectionMethod, MediaKind, MethodCategory};

/// Name of the facial landmark method.
pub const FACIAL_LANDMARKS: &str = "Facial Landmark Analysis";
/// Name of the temporal coherence method.
pub const TEMPORAL_COHERENCE: &str = "Temporal Coherence";
/// Name of the compression artifact method.
pub const COMPRESSION_ARTIFACTS: &str = "Compression Artifacts";
/// Name of the spectral audio method.
pub const SPECTRAL_ANALYSIS: &str = "Spectral Analysis";

/// Facial landmark consistency, any kind.
#[must_use]
pub const fn facial(sampler: PlaceholderSampler) -> PlaceholderMethod {
    PlaceholderMethod::new(
        FACIAL_LANDMARKS,
        MethodCategory::Visual,
        ScoreRange::new(0.7, 0.3),
        ScoreRange::new(0.8, 0.2),
        "Analyzed facial geometry and landmark consistency",
        sampler,
    )
}

/// Frame-to-frame coherence, any kind.
#[must_use]
pub const fn temporal(sampler: PlaceholderSampler) -> PlaceholderMethod {
    PlaceholderMethod::new(
        TEMPORAL_COHERENCE,
        MethodCategory::Temporal,
        ScoreRange::new(0.6, 0.4),
        ScoreRange::new(0.75, 0.2),
        "Examined frame-to-frame consistency and motion patterns",
        sampler,
    )
}

/// Compression patterns and fingerprints, any kind.
#[must_use]
pub const fn compression(sampler: PlaceholderSampler) -> PlaceholderMethod {
    PlaceholderMethod::new(
        COMPRESSION_ARTIFACTS,
        MethodCategory::Metadata,
        ScoreRange::new(0.65, 0.3),
        ScoreRange::new(0.7, 0.25),
        "Detected compression patterns and digital fingerprints",
        sampler,
    )
}

/// Frequency and voice characteristics, audio only.
#[must_use]
pub fn spectral(sampler: PlaceholderSampler) -> PlaceholderMethod {
    PlaceholderMethod::new(
        SPECTRAL_ANALYSIS,
        MethodCategory::Audio,
        ScoreRange::new(0.7, 0.3),
        ScoreRange::new(0.8, 0.2),
        "Analyzed frequency patterns and voice characteristics",
        sampler,
    )
    .only_for(MediaKind::Audio)
}

/// Which standard methods to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MethodSelection {
    /// Enable [`FACIAL_LANDMARKS`].
    pub facial: bool,
    /// Enable [`TEMPORAL_COHERENCE`].
    pub temporal: bool,
    /// Enable [`COMPRESSION_ARTIFACTS`].
    pub compression: bool,
    /// Enable [`SPECTRAL_ANALYSIS`].
    pub spectral: bool,
}

impl Default for MethodSelection {
    fn default() -> Self {
        Self {
            facial: true,
            temporal: true,
            compression: true,
            spectral: true,
        }
    }
}

/// Builds the enabled standard methods in declaration order.
#[must_use]
pub fn standard_methods(selection: MethodSelection, seed: u64) -> Vec<Box<dyn DetectionMethod>> {
    let sampler = PlaceholderSampler::new(seed);
    let candidates = [
        (selection.facial, facial(sampler)),
        (selection.temporal, temporal(sampler)),
        (selection.compression, compression(sampler)),
        (selection.spectral, spectral(sampler)),
    ];

    candidates
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, method)| Box::new(method) as Box<dyn DetectionMethod>)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{MediaItem, MediaLocation};

    fn media(kind: MediaKind) -> MediaItem {
        MediaItem::new(
            "sample",
            kind,
            1024,
            MediaLocation::Local {
                path: "sample.bin".into(),
            },
        )
    }

    #[test]
    fn test_standard_order() {
        let names: Vec<_> = standard_methods(MethodSelection::default(), 0)
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                FACIAL_LANDMARKS,
                TEMPORAL_COHERENCE,
                COMPRESSION_ARTIFACTS,
                SPECTRAL_ANALYSIS
            ]
        );
    }

    #[test]
    fn test_selection_disables_methods() {
        let selection = MethodSelection {
            temporal: false,
            spectral: false,
            ..MethodSelection::default()
        };
        let names: Vec<_> = standard_methods(selection, 0)
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, [FACIAL_LANDMARKS, COMPRESSION_ARTIFACTS]);
    }

    #[test]
    fn test_spectral_only_for_audio() {
        let method = spectral(PlaceholderSampler::default());
        assert!(method.applies_to(MediaKind::Audio));
        assert!(!method.applies_to(MediaKind::Image));
        assert!(!method.applies_to(MediaKind::Video));
        assert!(method.detect(&media(MediaKind::Video)).is_err());
    }

    #[test]
    fn test_outputs_within_ranges() {
        let sampler = PlaceholderSampler::new(7);
        let methods = [
            facial(sampler),
            temporal(sampler),
            compression(sampler),
            spectral(sampler),
        ];
        for _ in 0..50 {
            let item = media(MediaKind::Audio);
            for method in &methods {
                let output = method.detect(&item).unwrap();
                assert!(method.score_range().contains(output.score), "{output:?}");
                assert!(
                    method.confidence_range().contains(output.confidence),
                    "{output:?}"
                );
                assert_eq!(output.category, method.category());
                assert!(!output.details.is_empty());
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let item = media(MediaKind::Image);
        let first = facial(PlaceholderSampler::new(42)).detect(&item).unwrap();
        let second = facial(PlaceholderSampler::new(42)).detect(&item).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_samples_differ_per_item() {
        let method = temporal(PlaceholderSampler::new(1));
        let scores: Vec<_> = (0..8)
            .map(|_| method.detect(&media(MediaKind::Video)).unwrap().score)
            .collect();
        assert!(scores.windows(2).any(|w| (w[0] - w[1]).abs() > f64::EPSILON));
    }

    #[test]
    fn test_unit_sample_bounds() {
        let range = ScoreRange::new(0.6, 0.4);
        assert!((range.at(0.0) - 0.6).abs() < f64::EPSILON);
        assert!((range.at(1.0) - 1.0).abs() < f64::EPSILON);
        assert!(range.contains(0.8));
        assert!(!range.contains(0.5));
    }
}
