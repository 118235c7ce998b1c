//! Structure extraction for Python sources
//!
//! Keeps imports, dunder assignments, class/def signatures, docstring
//! delimiter lines, and comments; all other body lines are dropped.

use crate::engine::StructuralExtractor;
use frugal_core::CondenseMethod;

pub struct PythonExtractor;

impl StructuralExtractor for PythonExtractor {
    fn method(&self) -> CondenseMethod {
        CondenseMethod::PythonStructureExtraction
    }

    fn condense(&self, text: &str) -> String {
        condense_python(text)
    }
}

fn condense_python(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::new();

    for line in &lines {
        let trimmed = line.trim();

        let is_import = trimmed.starts_with("import ") || trimmed.starts_with("from ");
        let is_dunder = trimmed.starts_with("__") && trimmed.contains("__ =");
        let is_signature = trimmed.starts_with("class ")
            || trimmed.starts_with("def ")
            || trimmed.starts_with("async def ");
        let is_docstring_delim = trimmed.contains("\"\"\"") || trimmed.contains("'''");
        let is_comment = trimmed.starts_with('#');

        if is_import || is_dunder || is_signature || is_docstring_delim || is_comment {
            out.push(line.to_string());
        }
    }

    format!(
        "# condensed: {} -> {} lines (python_structure_extraction)\n{}",
        lines.len(),
        out.len(),
        out.join("\n")
    )
}
