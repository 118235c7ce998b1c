//! File classification by extension

use serde::{Deserialize, Serialize};

/// Content category driving strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Source code with declaration-level structure
    #[serde(rename = "structured-code")]
    StructuredCode,
    /// Structured data formats (JSON)
    #[serde(rename = "markup-data")]
    MarkupData,
    /// Prose documents (Markdown)
    #[serde(rename = "prose")]
    Prose,
    /// Configuration files
    #[serde(rename = "config")]
    Config,
    /// Never condensed
    #[serde(rename = "unknown")]
    Unknown,
}

/// Classification result: category plus a language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub language: &'static str,
}

impl Classification {
    const fn new(category: Category, language: &'static str) -> Self {
        Self { category, language }
    }
}

/// Classify a file path by extension. Pure and deterministic.
pub fn classify(path: &str) -> Classification {
    use Category::*;

    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    // .env files have no conventional extension
    if name == ".env" || name.starts_with(".env.") {
        return Classification::new(Config, "env");
    }

    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => return Classification::new(Unknown, "unknown"),
    };

    match ext.as_str() {
        "ts" | "tsx" => Classification::new(StructuredCode, "typescript"),
        "js" | "jsx" | "mjs" | "cjs" => Classification::new(StructuredCode, "javascript"),
        "py" => Classification::new(StructuredCode, "python"),
        "rs" => Classification::new(StructuredCode, "rust"),
        "go" => Classification::new(StructuredCode, "go"),
        "java" => Classification::new(StructuredCode, "java"),
        "c" | "h" => Classification::new(StructuredCode, "c"),
        "cpp" | "cc" | "hpp" => Classification::new(StructuredCode, "cpp"),
        "json" => Classification::new(MarkupData, "json"),
        "md" | "markdown" => Classification::new(Prose, "markdown"),
        "yml" | "yaml" => Classification::new(Config, "yaml"),
        "toml" => Classification::new(Config, "toml"),
        "ini" | "properties" | "env" => Classification::new(Config, "properties"),
        _ => Classification::new(Unknown, "unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_code() {
        assert_eq!(classify("src/app.ts").category, Category::StructuredCode);
        assert_eq!(classify("src/app.ts").language, "typescript");
        assert_eq!(classify("lib/util.jsx").language, "javascript");
        assert_eq!(classify("scripts/run.py").language, "python");
    }

    #[test]
    fn test_classify_data_prose_config() {
        assert_eq!(classify("package.json").category, Category::MarkupData);
        assert_eq!(classify("README.md").category, Category::Prose);
        assert_eq!(classify("ci/deploy.yaml").category, Category::Config);
        assert_eq!(classify("Cargo.toml").category, Category::Config);
        assert_eq!(classify(".env").category, Category::Config);
        assert_eq!(classify(".env.local").category, Category::Config);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("image.png").category, Category::Unknown);
        assert_eq!(classify("Makefile").category, Category::Unknown);
        assert_eq!(classify("noext").category, Category::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for path in ["a/b.ts", "x.json", "weird.xyz"] {
            assert_eq!(classify(path), classify(path));
        }
    }

    #[test]
    fn test_classify_case_insensitive_extension() {
        assert_eq!(classify("src/App.TSX").language, "typescript");
        assert_eq!(classify("DATA.JSON").category, Category::MarkupData);
    }
}
