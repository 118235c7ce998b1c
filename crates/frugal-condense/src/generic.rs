//! Generic fallback: head, midpoint window, tail

const EDGE_LINES: usize = 20;
const WINDOW_LINES: usize = 20;

/// Keep the first 20 lines, a 20-line window at the midpoint, and the last
/// 20 lines, with omission markers between. Files too small for the three
/// segments to be disjoint are returned unchanged.
pub fn condense_generic(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len();

    if total <= EDGE_LINES * 2 + WINDOW_LINES + 10 {
        return text.to_string();
    }

    let mid_start = total / 2 - WINDOW_LINES / 2;
    let mid_end = mid_start + WINDOW_LINES;
    let tail_start = total - EDGE_LINES;

    let mut out: Vec<String> = Vec::new();
    out.extend(lines[..EDGE_LINES].iter().map(|l| l.to_string()));
    out.push(format!("... ({} lines omitted) ...", mid_start - EDGE_LINES));
    out.extend(lines[mid_start..mid_end].iter().map(|l| l.to_string()));
    out.push(format!("... ({} lines omitted) ...", tail_start - mid_end));
    out.extend(lines[tail_start..].iter().map(|l| l.to_string()));

    out.join("\n")
}
