//! Detection runner: selects and invokes the methods for a media item.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::batch::CancellationToken;
use crate::domain::{DetectionMethod, DetectionMethodOutput, MediaItem, MediaKind};
use crate::error::AnalysisError;

/// Configuration for the detection runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerConfig {
    /// Run one item's methods concurrently on the rayon pool.
    pub parallel_methods: bool,
}

/// Invokes the applicable detection methods in declaration order.
pub struct DetectionRunner {
    methods: Vec<Box<dyn DetectionMethod>>,
    config: RunnerConfig,
}

impl DetectionRunner {
    /// Creates a runner over `methods`, invoked in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DuplicateMethod`] if two methods share a name.
    pub fn new(
        methods: Vec<Box<dyn DetectionMethod>>,
        config: RunnerConfig,
    ) -> Result<Self, AnalysisError> {
        let mut seen = HashSet::new();
        for method in &methods {
            if !seen.insert(method.name().to_string()) {
                return Err(AnalysisError::DuplicateMethod(method.name().to_string()));
            }
        }
        Ok(Self { methods, config })
    }

    /// Returns the runner configuration.
    #[must_use]
    pub const fn config(&self) -> RunnerConfig {
        self.config
    }

    /// All configured methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &dyn DetectionMethod> {
        self.methods.iter().map(AsRef::as_ref)
    }

    /// Methods that apply to `kind`, in declaration order.
    #[must_use]
    pub fn selected(&self, kind: MediaKind) -> Vec<&dyn DetectionMethod> {
        self.methods().filter(|m| m.applies_to(kind)).collect()
    }

    /// Runs every applicable method and returns their outputs.
    #[must_use]
    pub fn run(&self, media: &MediaItem) -> Vec<DetectionMethodOutput> {
        // A fresh token is never cancelled.
        self.run_observed(media, &CancellationToken::new(), &mut |_, _| {})
            .unwrap_or_default()
    }

    /// Runs every applicable method, checking `token` before each invocation.
    ///
    /// `on_progress(done, total)` is called after each method completes; when
    /// methods run in parallel it is called once after the join.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] if the token fires mid-item. No
    /// partial output is returned in that case.
    pub fn run_observed(
        &self,
        media: &MediaItem,
        token: &CancellationToken,
        on_progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<DetectionMethodOutput>, AnalysisError> {
        let selected = self.selected(media.kind);
        let total = selected.len();
        debug!("Running {total} methods on {} ({})", media.name, media.kind);

        if self.config.parallel_methods {
            let outputs = selected
                .par_iter()
                .map(|method| {
                    token.check()?;
                    Ok(invoke(*method, media))
                })
                .collect::<Result<Vec<_>, AnalysisError>>()?;
            on_progress(total, total);
            return Ok(outputs);
        }

        let mut outputs = Vec::with_capacity(total);
        for (done, method) in selected.into_iter().enumerate() {
            token.check()?;
            outputs.push(invoke(method, media));
            on_progress(done + 1, total);
        }
        Ok(outputs)
    }
}

/// Invokes one method, recovering failures and repairing out-of-range values.
///
/// The output always carries the method's own name and category.
fn invoke(method: &dyn DetectionMethod, media: &MediaItem) -> DetectionMethodOutput {
    match method.detect(media) {
        Ok(mut output) => {
            if output.method_name != method.name() {
                debug!(
                    "{} reported itself as {}, renaming",
                    method.name(),
                    output.method_name
                );
                output.method_name = method.name().to_string();
            }
            output.category = method.category();
            let (output, violations) = output.sanitized();
            for violation in violations {
                warn!("Clamped output for {}: {violation}", media.name);
            }
            output
        }
        Err(failure) => {
            warn!("Detection failed for {}: {failure}", media.name);
            DetectionMethodOutput::failure_marker(
                method.name(),
                method.category(),
                &failure.reason,
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{MediaLocation, MethodCategory};
    use crate::error::DetectionFailure;

    struct Scripted {
        name: &'static str,
        score: f64,
        audio_only: bool,
        fail: bool,
    }

    impl Scripted {
        fn boxed(name: &'static str, score: f64) -> Box<dyn DetectionMethod> {
            Box::new(Self {
                name,
                score,
                audio_only: false,
                fail: false,
            })
        }
    }

    impl DetectionMethod for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn category(&self) -> MethodCategory {
            MethodCategory::Metadata
        }

        fn applies_to(&self, kind: MediaKind) -> bool {
            !self.audio_only || kind == MediaKind::Audio
        }

        fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
            if self.fail {
                return Err(DetectionFailure::new(self.name, "unsupported media"));
            }
            Ok(DetectionMethodOutput::new(
                self.name,
                self.category(),
                self.score,
                0.5,
                "scripted",
            ))
        }
    }

    fn media(kind: MediaKind) -> MediaItem {
        MediaItem::new(
            "clip",
            kind,
            0,
            MediaLocation::Remote {
                url: "https://example.com/clip".into(),
            },
        )
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = DetectionRunner::new(
            vec![Scripted::boxed("a", 0.5), Scripted::boxed("a", 0.7)],
            RunnerConfig::default(),
        );
        assert_eq!(
            result.err(),
            Some(AnalysisError::DuplicateMethod("a".into()))
        );
    }

    #[test]
    fn test_outputs_in_declaration_order() {
        let runner = DetectionRunner::new(
            vec![
                Scripted::boxed("first", 0.1),
                Scripted::boxed("second", 0.2),
                Scripted::boxed("third", 0.3),
            ],
            RunnerConfig::default(),
        )
        .unwrap();

        let names: Vec<_> = runner
            .run(&media(MediaKind::Image))
            .into_iter()
            .map(|o| o.method_name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_kind_specific_selection() {
        let spectral = Box::new(Scripted {
            name: "spectral",
            score: 0.9,
            audio_only: true,
            fail: false,
        });
        let runner = DetectionRunner::new(
            vec![Scripted::boxed("base", 0.5), spectral],
            RunnerConfig::default(),
        )
        .unwrap();

        assert_eq!(runner.run(&media(MediaKind::Video)).len(), 1);
        assert_eq!(runner.run(&media(MediaKind::Audio)).len(), 2);
    }

    #[test]
    fn test_failure_becomes_marker() {
        let failing = Box::new(Scripted {
            name: "broken",
            score: 0.9,
            audio_only: false,
            fail: true,
        });
        let runner =
            DetectionRunner::new(vec![Scripted::boxed("ok", 0.8), failing], RunnerConfig::default())
                .unwrap();

        let outputs = runner.run(&media(MediaKind::Image));
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].method_name, "broken");
        assert!(outputs[1].score.abs() < f64::EPSILON);
        assert!(outputs[1].confidence.abs() < f64::EPSILON);
        assert!(outputs[1].details.contains("unsupported media"));
    }

    #[test]
    fn test_out_of_range_clamped() {
        let runner =
            DetectionRunner::new(vec![Scripted::boxed("hot", 3.0)], RunnerConfig::default())
                .unwrap();
        let outputs = runner.run(&media(MediaKind::Image));
        assert!((outputs[0].score - 1.0).abs() < f64::EPSILON);
    }

    struct Impostor;

    impl DetectionMethod for Impostor {
        fn name(&self) -> &str {
            "impostor"
        }

        fn category(&self) -> MethodCategory {
            MethodCategory::Temporal
        }

        fn detect(&self, _media: &MediaItem) -> Result<DetectionMethodOutput, DetectionFailure> {
            Ok(DetectionMethodOutput::new(
                "honest",
                MethodCategory::Audio,
                0.7,
                0.7,
                "claims another identity",
            ))
        }
    }

    #[test]
    fn test_output_identity_comes_from_method() {
        let runner = DetectionRunner::new(
            vec![Scripted::boxed("honest", 0.9), Box::new(Impostor)],
            RunnerConfig::default(),
        )
        .unwrap();

        let outputs = runner.run(&media(MediaKind::Video));
        let names: Vec<_> = outputs.iter().map(|o| o.method_name.as_str()).collect();
        assert_eq!(names, ["honest", "impostor"]);
        assert_eq!(outputs[1].category, MethodCategory::Temporal);
    }

    #[test]
    fn test_progress_reported_per_method() {
        let runner = DetectionRunner::new(
            vec![Scripted::boxed("a", 0.5), Scripted::boxed("b", 0.5)],
            RunnerConfig::default(),
        )
        .unwrap();

        let mut seen = Vec::new();
        runner
            .run_observed(&media(MediaKind::Image), &CancellationToken::new(), &mut |d, t| {
                seen.push((d, t));
            })
            .unwrap();
        assert_eq!(seen, [(1, 2), (2, 2)]);
    }

    #[test]
    fn test_cancelled_token_stops_run() {
        let runner =
            DetectionRunner::new(vec![Scripted::boxed("a", 0.5)], RunnerConfig::default())
                .unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = runner.run_observed(&media(MediaKind::Image), &token, &mut |_, _| {});
        assert_eq!(result, Err(AnalysisError::Cancelled));
    }

    #[test]
    fn test_parallel_methods_keep_order() {
        let methods = (0..16)
            .map(|i| -> Box<dyn DetectionMethod> {
                Box::new(Scripted {
                    name: Box::leak(format!("m{i}").into_boxed_str()),
                    score: 0.5,
                    audio_only: false,
                    fail: false,
                })
            })
            .collect();
        let runner = DetectionRunner::new(
            methods,
            RunnerConfig {
                parallel_methods: true,
            },
        )
        .unwrap();

        let mut calls = Vec::new();
        let outputs = runner
            .run_observed(&media(MediaKind::Video), &CancellationToken::new(), &mut |d, t| {
                calls.push((d, t));
            })
            .unwrap();
        let names: Vec<_> = outputs.iter().map(|o| o.method_name.clone()).collect();
        let expected: Vec<_> = (0..16).map(|i| format!("m{i}")).collect();
        assert_eq!(names, expected);
        assert_eq!(calls, [(16, 16)]);
    }
}
