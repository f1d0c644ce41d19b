//! Configuration file support for veracity.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/veracity/config.toml` (lowest priority)
//! - Project-local: `.veracity.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Name of the project-local config file.
const PROJECT_FILE: &str = ".veracity.toml";

/// Output formats accepted in `[output] format`.
pub const OUTPUT_FORMATS: [&str; 3] = ["jsonl", "json", "csv"];

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Scoring options.
    pub analysis: AnalysisConfig,
    /// Detection method toggles.
    pub methods: MethodsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
    /// Items analyzed concurrently.
    pub workers: Option<usize>,
    /// Seed for the placeholder score sampler.
    pub seed: Option<u64>,
}

/// Scoring configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trust scores strictly above this are authentic (0-100).
    pub threshold: Option<u32>,
    /// Run one item's methods concurrently.
    pub parallel_methods: Option<bool>,
}

/// Detection method toggles.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MethodsConfig {
    /// Facial landmark analysis.
    pub facial: Option<bool>,
    /// Temporal coherence.
    pub temporal: Option<bool>,
    /// Compression artifacts.
    pub compression: Option<bool>,
    /// Spectral analysis (audio only).
    pub spectral: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "jsonl", "json" or "csv".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/veracity/config.toml`
    /// 2. Project-local: `.veracity.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.drop_invalid() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Clears values outside their accepted ranges, returning one message
    /// per cleared value.
    fn drop_invalid(&mut self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(t) = self.analysis.threshold {
            if t > 100 {
                problems.push(format!("analysis.threshold must be 0-100, got {t}"));
                self.analysis.threshold = None;
            }
        }
        if self.general.workers == Some(0) {
            problems.push("general.workers must be at least 1, got 0".to_string());
            self.general.workers = None;
        }
        if let Some(ref f) = self.output.format {
            if !OUTPUT_FORMATS.contains(&f.as_str()) {
                problems.push(format!(
                    "output.format must be 'jsonl', 'json' or 'csv', got '{f}'"
                ));
                self.output.format = None;
            }
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);
        self.general.workers = other.general.workers.or(self.general.workers);
        self.general.seed = other.general.seed.or(self.general.seed);

        // Analysis
        self.analysis.threshold = other.analysis.threshold.or(self.analysis.threshold);
        self.analysis.parallel_methods = other
            .analysis
            .parallel_methods
            .or(self.analysis.parallel_methods);

        // Methods
        self.methods.facial = other.methods.facial.or(self.methods.facial);
        self.methods.temporal = other.methods.temporal.or(self.methods.temporal);
        self.methods.compression = other.methods.compression.or(self.methods.compression);
        self.methods.spectral = other.methods.spectral.or(self.methods.spectral);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("veracity").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.veracity.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
