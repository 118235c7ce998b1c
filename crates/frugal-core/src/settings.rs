//! Optimization settings
//!
//! Settings are externally editable at any time, so callers load a fresh
//! snapshot for every decision cycle and pass it down by reference. Nothing
//! in the pipeline caches a settings value across cycles.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// External advanced-optimizer endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Minimum estimated tokens before the remote service is consulted
    #[serde(default = "default_remote_min_tokens")]
    pub min_tokens: usize,
}

fn default_remote_min_tokens() -> usize {
    20_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    pub enabled: bool,

    /// Total estimated tokens above which optimization fires
    pub token_threshold: usize,

    /// File-block count above which optimization fires
    pub file_count_threshold: usize,

    /// Minimum reduction percentage required to accept a remote result
    pub reduction_threshold: f64,

    /// Fire at a much lower token floor (5k) regardless of thresholds
    pub aggressive_mode: bool,

    /// Extensions never condensed regardless of classification
    pub preserve_file_types: Vec<String>,

    /// Chars-per-token divisor for estimation (see frugal-store tokens)
    pub chars_per_token: f64,

    /// Estimate with a content-aware divisor instead of `chars_per_token`
    pub calibrated_estimation: bool,

    pub remote: Option<RemoteSettings>,
}

impl OptimizationSettings {
    pub fn new() -> Self {
        Self {
            enabled: true,
            token_threshold: 50_000,
            file_count_threshold: 15,
            reduction_threshold: 20.0,
            aggressive_mode: false,
            preserve_file_types: Vec::new(),
            chars_per_token: frugal_store::DEFAULT_CHARS_PER_TOKEN,
            calibrated_estimation: false,
            remote: None,
        }
    }

    /// Load a fresh snapshot from disk; a missing or unreadable file yields
    /// defaults so the watcher never stalls on configuration problems.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::new();
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                Self::new()
            }
        }
    }

    pub fn preserves(&self, path: &str) -> bool {
        let ext = path.rsplit('.').next().unwrap_or_default().to_lowercase();
        self.preserve_file_types
            .iter()
            .any(|p| p.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self::new()
    }
}
