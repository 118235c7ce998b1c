//! Structure extraction for TypeScript/JavaScript-like sources
//!
//! Line/brace scanning, not a real parser; cheap and good enough for
//! declaration-level structure. Preserved verbatim: imports/exports,
//! complete interface/type declarations, declaration headers, comments.
//! Function bodies keep only control-significant lines.

use crate::engine::StructuralExtractor;
use frugal_core::CondenseMethod;

pub struct JsExtractor;

impl StructuralExtractor for JsExtractor {
    fn method(&self) -> CondenseMethod {
        CondenseMethod::JsStructureExtraction
    }

    fn condense(&self, text: &str) -> String {
        condense_js(text)
    }
}

fn condense_js(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::new();

    let mut depth: i32 = 0;
    // When Some(d), copy lines verbatim until depth returns to d
    // (balanced-brace scan over an interface/type declaration)
    let mut keep_until_depth: Option<i32> = None;

    for line in &lines {
        let trimmed = line.trim();
        let start_depth = depth;
        depth += line.matches('{').count() as i32;
        depth -= line.matches('}').count() as i32;

        if let Some(end_depth) = keep_until_depth {
            out.push(line.to_string());
            if depth <= end_depth {
                keep_until_depth = None;
            }
            continue;
        }

        let is_comment = trimmed.starts_with("//")
            || trimmed.starts_with("/*")
            || trimmed.starts_with('*');
        let is_type_decl = starts_with_any(
            trimmed,
            &[
                "interface ",
                "type ",
                "export interface ",
                "export type ",
                "declare interface ",
            ],
        );
        let is_import = trimmed.starts_with("import ")
            || trimmed.starts_with("export ")
            || trimmed.starts_with("} from ");

        if is_type_decl {
            out.push(line.to_string());
            if depth > start_depth {
                keep_until_depth = Some(start_depth);
            }
            continue;
        }

        if is_comment || is_import {
            out.push(line.to_string());
            continue;
        }

        // Declaration headers: class lines and lines opening a function body
        let is_decl_header = starts_with_any(trimmed, &["class ", "abstract class "])
            || trimmed.contains("function ")
            || (trimmed.ends_with('{') && trimmed.contains('(') && start_depth <= 1);
        if is_decl_header {
            out.push(line.to_string());
            continue;
        }

        if start_depth >= 1 {
            // Inside a body: keep returns, throws, log calls, and direct
            // body-level lines; re-indent to signal abbreviation
            let significant = trimmed.starts_with("return")
                || trimmed.starts_with("throw")
                || trimmed.contains("console.")
                || trimmed.contains("logger.");
            if significant || start_depth == 1 {
                out.push(format!("  {}", trimmed));
            }
            continue;
        }

        // Top-level statement outside any block
        out.push(line.to_string());
    }

    format!(
        "// condensed: {} -> {} lines (js_structure_extraction)\n{}",
        lines.len(),
        out.len(),
        out.join("\n")
    )
}

fn starts_with_any(s: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| s.starts_with(p))
}
