//! Shared result types for condensation and job recording

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a file block was condensed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CondenseMethod {
    #[serde(rename = "js_structure_extraction")]
    JsStructureExtraction,
    #[serde(rename = "python_structure_extraction")]
    PythonStructureExtraction,
    #[serde(rename = "json_depth_limit")]
    JsonDepthLimit,
    /// Byte truncation fallback; the one method allowed to emit
    /// non-parseable output
    #[serde(rename = "json_truncation")]
    JsonTruncation,
    #[serde(rename = "markdown_outline")]
    MarkdownOutline,
    #[serde(rename = "config_comment_strip")]
    ConfigCommentStrip,
    #[serde(rename = "generic_truncation")]
    GenericTruncation,
    #[serde(rename = "remote_optimization")]
    RemoteOptimization,
    /// Original content kept unchanged
    #[serde(rename = "no_compression")]
    NoCompression,
}

impl CondenseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsStructureExtraction => "js_structure_extraction",
            Self::PythonStructureExtraction => "python_structure_extraction",
            Self::JsonDepthLimit => "json_depth_limit",
            Self::JsonTruncation => "json_truncation",
            Self::MarkdownOutline => "markdown_outline",
            Self::ConfigCommentStrip => "config_comment_strip",
            Self::GenericTruncation => "generic_truncation",
            Self::RemoteOptimization => "remote_optimization",
            Self::NoCompression => "no_compression",
        }
    }
}

/// Result of condensing a single file block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CondensedFile {
    pub path: String,
    pub original_size: usize,
    pub condensed_size: usize,
    pub content: String,
    /// condensed_size / original_size
    pub compression_ratio: f64,
    pub method: CondenseMethod,
}

impl CondensedFile {
    pub fn unchanged(path: &str, content: &str) -> Self {
        Self {
            path: path.to_string(),
            original_size: content.len(),
            condensed_size: content.len(),
            content: content.to_string(),
            compression_ratio: 1.0,
            method: CondenseMethod::NoCompression,
        }
    }

    pub fn from_transform(path: &str, original: &str, condensed: String, method: CondenseMethod) -> Self {
        let original_size = original.len();
        let condensed_size = condensed.len();
        let compression_ratio = if original_size == 0 {
            1.0
        } else {
            condensed_size as f64 / original_size as f64
        };
        Self {
            path: path.to_string(),
            original_size,
            condensed_size,
            content: condensed,
            compression_ratio,
            method,
        }
    }
}

/// Immutable record of one applied optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationJob {
    pub task_id: String,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
    pub tokens_saved: usize,
    pub reduction_pct: f64,
    /// Count of condensed blocks per method tag
    #[serde(default)]
    pub method_counts: HashMap<String, usize>,
    pub timestamp: DateTime<Utc>,
}

impl OptimizationJob {
    pub fn new(
        task_id: &str,
        original_tokens: usize,
        optimized_tokens: usize,
        method_counts: HashMap<String, usize>,
    ) -> Self {
        let tokens_saved = original_tokens.saturating_sub(optimized_tokens);
        let reduction_pct = if original_tokens == 0 {
            0.0
        } else {
            tokens_saved as f64 / original_tokens as f64 * 100.0
        };
        Self {
            task_id: task_id.to_string(),
            original_tokens,
            optimized_tokens,
            tokens_saved,
            reduction_pct,
            method_counts,
            timestamp: Utc::now(),
        }
    }
}
