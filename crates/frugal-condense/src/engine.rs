//! Strategy dispatch and acceptance
//!
//! Categories map to strategies; heuristic language extractors sit behind
//! `StructuralExtractor` so a real parser can be substituted per language
//! without touching the trigger or mutation layers.

use crate::code::JsExtractor;
use crate::config::condense_config;
use crate::generic::condense_generic;
use crate::json::condense_json;
use crate::markdown::condense_markdown;
use crate::python::PythonExtractor;
use frugal_core::{
    classify, is_eligible, Category, CondenseMethod, CondensedFile, OptimizationSettings,
};
use std::collections::HashMap;

/// Maximum accepted compression ratio; anything above keeps the original
pub const ACCEPT_RATIO: f64 = 0.8;

/// Generic fallback applies to files longer than this when no category
/// strategy fits
const GENERIC_LINE_FLOOR: usize = 100;

/// Declaration-level structure extraction for one language
pub trait StructuralExtractor: Send + Sync {
    fn method(&self) -> CondenseMethod;
    fn condense(&self, text: &str) -> String;
}

/// Owns the per-language extractors; passed by reference into the pipeline
pub struct CondenseEngine {
    extractors: HashMap<&'static str, Box<dyn StructuralExtractor>>,
}

impl CondenseEngine {
    pub fn new() -> Self {
        let mut extractors: HashMap<&'static str, Box<dyn StructuralExtractor>> = HashMap::new();
        extractors.insert("typescript", Box::new(JsExtractor));
        extractors.insert("javascript", Box::new(JsExtractor));
        extractors.insert("python", Box::new(PythonExtractor));
        Self { extractors }
    }

    /// Condense one extracted file block.
    ///
    /// Ineligible or preserved files come back unchanged; an accepted
    /// condensation has shrunk by at least 20%, otherwise the original
    /// content is kept byte-for-byte with method `no_compression`.
    pub fn condense_block(
        &self,
        path: &str,
        content: &str,
        settings: &OptimizationSettings,
    ) -> CondensedFile {
        let classification = classify(path);

        if settings.preserves(path) || !is_eligible(content, classification) {
            return CondensedFile::unchanged(path, content);
        }

        let (condensed, method) = self.apply_strategy(classification, content);
        let result = CondensedFile::from_transform(path, content, condensed, method);

        if result.compression_ratio > ACCEPT_RATIO {
            tracing::debug!(
                path,
                ratio = result.compression_ratio,
                "condensation below reduction floor, keeping original"
            );
            return CondensedFile::unchanged(path, content);
        }
        result
    }

    fn apply_strategy(
        &self,
        classification: frugal_core::Classification,
        content: &str,
    ) -> (String, CondenseMethod) {
        match classification.category {
            Category::StructuredCode => {
                if let Some(extractor) = self.extractors.get(classification.language) {
                    return (extractor.condense(content), extractor.method());
                }
                self.generic_or_unchanged(content)
            }
            Category::MarkupData => condense_json(content),
            Category::Prose => (
                condense_markdown(content),
                CondenseMethod::MarkdownOutline,
            ),
            Category::Config => (condense_config(content), CondenseMethod::ConfigCommentStrip),
            Category::Unknown => (content.to_string(), CondenseMethod::NoCompression),
        }
    }

    fn generic_or_unchanged(&self, content: &str) -> (String, CondenseMethod) {
        if content.lines().count() > GENERIC_LINE_FLOOR {
            (condense_generic(content), CondenseMethod::GenericTruncation)
        } else {
            (content.to_string(), CondenseMethod::NoCompression)
        }
    }
}

impl Default for CondenseEngine {
    fn default() -> Self {
        Self::new()
    }
}
