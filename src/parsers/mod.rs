//! Source code parsers using tree-sitter
//!
//! Every supported language is parsed with its tree-sitter grammar and the
//! resulting syntax tree is converted into a language-neutral [`Node`] tree.

mod convert;

pub use convert::{convert, strip_comment_markers};

use crate::uast::Node;
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::Parser;

/// Languages with a bundled grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
    Go,
    Java,
    CSharp,
    C,
    Cpp,
}

impl Language {
    /// Detect the language of a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Detect the language of a path from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

/// Get the language name for a file extension
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    Language::from_extension(ext).map(|l| l.name())
}

/// Get all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "py", "pyi", // Python
        "js", "jsx", "mjs", "cjs", // JavaScript
        "ts", "mts", "cts", "tsx", // TypeScript
        "rs",   // Rust
        "go",   // Go
        "java", // Java
        "cs",   // C#
        "c", "h", // C
        "cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++", // C++
    ]
}

/// Whether a path has a parseable extension
pub fn is_supported(path: &Path) -> bool {
    Language::from_path(path).is_some()
}

/// Parse source text of the given language into a structural tree
pub fn parse(language: Language, source: &str) -> Result<Node> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .with_context(|| format!("Failed to set {} language", language.name()))?;

    let tree = parser
        .parse(source, None)
        .with_context(|| format!("Failed to parse {} source", language.name()))?;

    Ok(convert(tree.root_node(), source.as_bytes()))
}

/// Parse source text by extension. Unknown extensions yield `None`.
pub fn parse_source(ext: &str, source: &str) -> Result<Option<Node>> {
    match Language::from_extension(ext) {
        Some(language) => parse(language, source).map(Some),
        None => Ok(None),
    }
}

/// Read and parse a file. Unknown extensions yield `None`.
pub fn parse_file(path: &Path) -> Result<Option<Node>> {
    let Some(language) = Language::from_path(path) else {
        return Ok(None);
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse(language, &source).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn comments(tree: &Node) -> Vec<(&str, u32)> {
        tree.iter()
            .filter(|n| n.is_comment())
            .map(|n| (n.token.as_str(), n.start.map(|p| p.line).unwrap_or(0)))
            .collect()
    }

    #[test]
    fn test_unknown_extension_returns_none() {
        assert!(parse_source("unknown", "whatever").unwrap().is_none());
        assert!(parse_file(&PathBuf::from("notes.txt")).unwrap().is_none());
        assert!(!is_supported(&PathBuf::from("Makefile")));
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(language_for_extension("rs"), Some("Rust"));
        assert_eq!(language_for_extension("hpp"), Some("C++"));
        assert_eq!(language_for_extension("tsx"), Some("TSX"));
        assert_eq!(language_for_extension("kt"), None);
        for ext in supported_extensions() {
            assert!(Language::from_extension(ext).is_some(), "{}", ext);
        }
    }

    #[test]
    fn test_rust_comments_with_lines() {
        let source = "// first line\n// second line\nfn main() {\n    /* block */\n}\n";
        let tree = parse_source("rs", source).unwrap().unwrap();
        assert_eq!(
            comments(&tree),
            vec![
                ("first line", 1),
                ("second line", 2),
                ("block", 4)
            ]
        );
    }

    #[test]
    fn test_python_comments() {
        let source = "import os\n\n# load the config\ndef f():\n    return 1  # inline\n";
        let tree = parse_source("py", source).unwrap().unwrap();
        assert_eq!(
            comments(&tree),
            vec![("load the config", 3), ("inline", 5)]
        );
    }

    #[test]
    fn test_every_grammar_finds_a_comment() {
        let samples = [
            ("js", "// note\nlet x = 1;\n"),
            ("ts", "// note\nlet x: number = 1;\n"),
            ("tsx", "// note\nconst a = <div/>;\n"),
            ("go", "package main\n// note\nfunc main() {}\n"),
            ("java", "// note\nclass A {}\n"),
            ("cs", "// note\nclass A {}\n"),
            ("c", "// note\nint main() { return 0; }\n"),
            ("cpp", "// note\nint main() { return 0; }\n"),
        ];
        for (ext, source) in samples {
            let tree = parse_source(ext, source).unwrap().unwrap();
            let found = comments(&tree);
            assert_eq!(found.len(), 1, "{}: {:?}", ext, found);
            assert_eq!(found[0].0, "note", "{}", ext);
        }
    }

    #[test]
    fn test_root_has_children_and_span() {
        let tree = parse_source("go", "package main\n\nfunc main() {}\n").unwrap().unwrap();
        assert_eq!(tree.internal_type, "source_file");
        assert!(!tree.children.is_empty());
        assert_eq!(tree.start.map(|p| p.line), Some(1));
    }
}
