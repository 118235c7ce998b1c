//! Token estimation utilities

/// Default chars-per-token divisor.
///
/// Empirically calibrated against assistant conversation logs; noticeably
/// lower than the ~4.0 often quoted for prose because logged content is
/// dominated by source code and JSON.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 1.72;

/// Estimate token count from text length using an explicit divisor.
///
/// The divisor is a known source of estimation error and varies with
/// content type, so it is always passed in rather than hardcoded.
pub fn estimate_tokens(text: &str, chars_per_token: f64) -> usize {
    if text.is_empty() {
        return 0;
    }
    let divisor = if chars_per_token > 0.0 {
        chars_per_token
    } else {
        DEFAULT_CHARS_PER_TOKEN
    };
    (text.len() as f64 / divisor).max(1.0) as usize
}

/// Per-category chars-per-token ratios blended by the calibrated estimator
const CODE_CHARS_PER_TOKEN: f64 = 2.5;
const MARKDOWN_CHARS_PER_TOKEN: f64 = 3.0;
const PROSE_CHARS_PER_TOKEN: f64 = 4.0;

/// Estimate tokens with a content-aware divisor instead of a fixed one.
///
/// Used when `calibrated_estimation` is enabled in settings: mixed
/// conversations get a divisor derived from how code-heavy, markdown-like,
/// or prose-like the text actually is.
pub fn estimate_tokens_calibrated(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.len() as f64 / blended_chars_per_token(text)).max(1.0) as usize
}

/// Weigh the per-category ratios by how strongly the text signals each
/// category. Symbol density and indentation pull toward code, heading and
/// list markers toward markdown, the remainder counts as prose.
fn blended_chars_per_token(text: &str) -> f64 {
    let total_chars = text.len().max(1) as f64;
    let total_lines = text.lines().count().max(1) as f64;

    let symbol_chars = text
        .chars()
        .filter(|&c| "{}[]();=<>|&!@#$%^*~`\\".contains(c))
        .count() as f64;
    let marker_chars = text.chars().filter(|&c| "#-*_>".contains(c)).count() as f64;
    let indented_lines = text
        .lines()
        .filter(|line| line.starts_with("    ") || line.starts_with('\t'))
        .count() as f64;

    let code = (symbol_chars / total_chars * 10.0 + indented_lines / total_lines * 0.5).min(1.0);
    let markdown = (marker_chars / total_chars * 8.0).min(1.0 - code);
    let prose = 1.0 - code - markdown;

    code * CODE_CHARS_PER_TOKEN + markdown * MARKDOWN_CHARS_PER_TOKEN + prose * PROSE_CHARS_PER_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_empty() {
        assert_eq!(estimate_tokens("", DEFAULT_CHARS_PER_TOKEN), 0);
        assert_eq!(estimate_tokens_calibrated(""), 0);
    }

    #[test]
    fn test_estimate_tokens_divisor() {
        let text = "x".repeat(1720);
        assert_eq!(estimate_tokens(&text, 1.72), 1000);
        assert_eq!(estimate_tokens(&text, 4.0), 430);
    }

    #[test]
    fn test_invalid_divisor_falls_back_to_default() {
        let text = "x".repeat(172);
        assert_eq!(estimate_tokens(&text, 0.0), 100);
        assert_eq!(estimate_tokens(&text, -1.0), 100);
    }

    #[test]
    fn test_scenario_arithmetic() {
        // A 15,000-char file block at the default ratio lands near 8,721
        let text = "y".repeat(15_000);
        let tokens = estimate_tokens(&text, DEFAULT_CHARS_PER_TOKEN);
        assert!((8_700..=8_750).contains(&tokens), "Got {}", tokens);
    }

    #[test]
    fn test_calibrated_code_vs_prose() {
        let code = "fn main() {\n    println!(\"Hello\");\n}";
        let tokens = estimate_tokens_calibrated(code);
        // Code should be ~2.5 chars/token, so 38 chars / 2.5 ~= 15 tokens
        assert!((12..=20).contains(&tokens), "Got {}", tokens);

        let prose = "This is a simple sentence with natural language that should be counted at about four characters per token.";
        let tokens = estimate_tokens_calibrated(prose);
        assert!((20..=32).contains(&tokens), "Got {}", tokens);
    }
}
