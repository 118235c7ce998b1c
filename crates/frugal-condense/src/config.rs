//! Config file trimming
//!
//! Configs rarely need structural reduction; dropping blank lines and
//! comments is enough. Comments flagged TODO or IMPORTANT are kept.

pub fn condense_config(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            let is_comment = trimmed.starts_with('#') || trimmed.starts_with(';');
            if is_comment {
                return trimmed.contains("TODO") || trimmed.contains("IMPORTANT");
            }
            true
        })
        .collect();
    kept.join("\n")
}
