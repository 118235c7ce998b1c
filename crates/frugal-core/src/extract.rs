//! File-block extraction from message text
//!
//! Two non-exclusive pattern families are matched over the full text: the
//! assistant's path-tagged `<file_content path="...">` wrapper, and the
//! "path line followed by a fenced code block" convention. Matches are
//! deduplicated by path, first occurrence wins.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<file_content path="([^"]+)">\n?(.*?)</file_content>"#)
        .expect("valid wrapper regex")
});

static PATH_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^([A-Za-z0-9_@][A-Za-z0-9_./\\-]*\.[A-Za-z0-9]+):?[ \t]*\n```[A-Za-z0-9+-]*\n(.*?)\n```")
        .expect("valid path-fence regex")
});

/// An extracted file block inside one text payload.
///
/// `span` covers exactly the raw content substring, so a replacement keeps
/// the surrounding wrapper tags or fence markers intact. Blocks are
/// transient: discovered at decision time, discarded after mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub path: String,
    pub raw_content: String,
    pub span: Range<usize>,
}

/// Extract all file blocks from a text payload, deduplicated by path and
/// with overlapping matches dropped (first match wins).
pub fn extract_file_blocks(text: &str) -> Vec<FileBlock> {
    let mut blocks: Vec<FileBlock> = Vec::new();

    for re in [&*WRAPPER_RE, &*PATH_FENCE_RE] {
        for caps in re.captures_iter(text) {
            let (Some(path), Some(content)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            blocks.push(FileBlock {
                path: path.as_str().to_string(),
                raw_content: content.as_str().to_string(),
                span: content.range(),
            });
        }
    }

    blocks.sort_by_key(|b| b.span.start);

    let mut seen_paths = std::collections::HashSet::new();
    let mut kept: Vec<FileBlock> = Vec::new();
    for block in blocks {
        if !seen_paths.insert(block.path.clone()) {
            continue;
        }
        if kept
            .last()
            .map(|prev| block.span.start < prev.span.end)
            .unwrap_or(false)
        {
            continue; // Nested fence inside a wrapper block
        }
        kept.push(block);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_extraction() {
        let text = "look at this:\n<file_content path=\"src/app.ts\">\nconst x = 1;\n</file_content>\ndone";
        let blocks = extract_file_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].path, "src/app.ts");
        assert_eq!(blocks[0].raw_content, "const x = 1;\n");
        assert_eq!(&text[blocks[0].span.clone()], "const x = 1;\n");
    }

    #[test]
    fn test_path_fence_extraction() {
        let text = "here is the file\nsrc/util.py:\n```python\ndef f():\n    return 1\n```\nthanks";
        let blocks = extract_file_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].path, "src/util.py");
        assert_eq!(blocks[0].raw_content, "def f():\n    return 1");
    }

    #[test]
    fn test_dedup_by_path_first_wins() {
        let text = "\
<file_content path=\"a.ts\">\nfirst\n</file_content>\n\
<file_content path=\"a.ts\">\nsecond\n</file_content>\n";
        let blocks = extract_file_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw_content, "first\n");
    }

    #[test]
    fn test_both_families_mixed() {
        let text = "\
<file_content path=\"a.json\">\n{}\n</file_content>\n\
notes\nb.md:\n```\n# Title\n```\n";
        let blocks = extract_file_blocks(text);
        let paths: Vec<_> = blocks.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["a.json", "b.md"]);
    }

    #[test]
    fn test_nested_fence_inside_wrapper_dropped() {
        let text = "\
<file_content path=\"doc.md\">\nintro\nx.js:\n```\ncode\n```\n</file_content>\n";
        let blocks = extract_file_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].path, "doc.md");
    }

    #[test]
    fn test_plain_text_has_no_blocks() {
        assert!(extract_file_blocks("just a question about rust").is_empty());
        assert!(extract_file_blocks("").is_empty());
    }
}
