//! Markdown outline extraction
//!
//! Headings and fenced code survive verbatim; each heading keeps only its
//! first following paragraph line. Blank lines are kept for spacing.

pub fn condense_markdown(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut paragraph_taken = false;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            out.push(line);
            continue;
        }
        if in_fence {
            out.push(line);
            continue;
        }

        if trimmed.starts_with('#') {
            out.push(line);
            paragraph_taken = false;
            continue;
        }

        if trimmed.is_empty() {
            out.push(line);
            continue;
        }

        if !paragraph_taken {
            out.push(line);
            paragraph_taken = true;
        }
    }

    out.join("\n")
}
