//! Structural complexity and contextual relevance scoring

use crate::classifier::{Category, Classification};

/// Files at or below this size are never worth condensing (chars)
pub const LARGE_FILE_THRESHOLD: usize = 10_000;

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "match", "try", "catch", "function", "def", "class",
    "interface", "impl", "fn", "return",
];

const IMPORTANT_NAMES: &[&str] = &["index", "main", "app", "config", "types", "utils"];

const NOISE_SEGMENTS: &[&str] = &[
    "test",
    "spec",
    "docs",
    "dist",
    "build",
    "node_modules",
    "target",
    "__pycache__",
];

/// Score structural complexity in [0,1].
///
/// Weighted sum of three capped factors: line count, maximum indentation
/// depth, and control-flow/declaration keyword density.
pub fn complexity_score(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let lines: Vec<&str> = text.lines().collect();
    let line_count = lines.len();

    // Line-count factor: saturates at 500 lines
    let line_factor = (line_count as f64 / 500.0).min(1.0);

    // Max indentation depth factor: saturates at depth 8 (2-space units)
    let max_indent = lines
        .iter()
        .map(|line| {
            let spaces = line.len() - line.trim_start_matches([' ', '\t']).len();
            let tabs = line.chars().take_while(|&c| c == '\t').count();
            spaces / 2 + tabs
        })
        .max()
        .unwrap_or(0);
    let indent_factor = (max_indent as f64 / 8.0).min(1.0);

    // Keyword density factor: each keyword's contribution capped, total capped
    let lower = text.to_lowercase();
    let mut keyword_factor = 0.0;
    for keyword in CONTROL_KEYWORDS {
        let count = lower.matches(keyword).count();
        keyword_factor += (count as f64 / 50.0).min(0.1);
    }
    let keyword_factor = keyword_factor.min(1.0);

    (line_factor * 0.4 + indent_factor * 0.3 + keyword_factor * 0.3).clamp(0.0, 1.0)
}

/// Score contextual relevance of a path in [0,1].
///
/// Seeded at 0.5; filenames on the importance list are boosted, paths with
/// noise segments (tests, docs, build artifacts) are penalized.
pub fn relevance_score(path: &str) -> f64 {
    let mut score = 0.5f64;
    let lower = path.to_lowercase();

    let file_stem = lower
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(&lower)
        .split('.')
        .next()
        .unwrap_or_default();

    if IMPORTANT_NAMES.contains(&file_stem) {
        score += 0.2;
    }

    for segment in NOISE_SEGMENTS {
        if lower.contains(segment) {
            score -= 0.2;
            break;
        }
    }

    score.clamp(0.0, 1.0)
}

/// A file is condensation-eligible only if it is large, structurally
/// complex, and classifiable.
pub fn is_eligible(text: &str, classification: Classification) -> bool {
    text.len() > LARGE_FILE_THRESHOLD
        && complexity_score(text) > 0.3
        && classification.category != Category::Unknown
}
