//! tree-sitter syntax tree to structural tree conversion

use crate::uast::{Node, Position, Role};

/// Line prefixes removed from comment text, longest first
const COMMENT_PREFIXES: &[&str] = &["///", "//!", "//", "/**", "/*!", "/*", "#", "*"];

/// A converted node whose named children are still pending
struct Frame<'t> {
    out: Node,
    pending: std::vec::IntoIter<tree_sitter::Node<'t>>,
}

/// Convert a named tree-sitter node and its named descendants.
///
/// Anonymous nodes (punctuation, keywords) are dropped. Leaves keep their
/// source text as token; comments keep their text without comment markers.
/// The walk keeps its own stack, so nesting depth is bounded by memory and
/// not by the thread stack.
pub fn convert(root: tree_sitter::Node<'_>, source: &[u8]) -> Node {
    let mut stack = vec![open(root, source)];
    let mut converted = Node::default();

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.pending.next() {
            stack.push(open(child, source));
        } else if let Some(done) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.out.children.push(done.out),
                None => converted = done.out,
            }
        }
    }
    converted
}

/// Convert a single node, leaving its children for the caller
fn open<'t>(node: tree_sitter::Node<'t>, source: &[u8]) -> Frame<'t> {
    let kind = node.kind();
    let start = position(node.start_byte(), node.start_position());
    let end = position(node.end_byte(), node.end_position());

    if kind.contains("comment") {
        // some grammars include the line terminator in line comments
        let raw = node.utf8_text(source).unwrap_or("").trim_end();
        let end = Position {
            line: start.line + raw.matches('\n').count() as u32,
            ..end
        };
        let mut out = Node::new(kind)
            .with_token(strip_comment_markers(raw))
            .with_role(Role::Comment)
            .with_span(Some(start), Some(end));
        if is_doc_comment(raw) {
            out = out.with_role(Role::Documentation);
        }
        return Frame {
            out,
            pending: Vec::new().into_iter(),
        };
    }

    let mut out = Node::new(kind).with_span(Some(start), Some(end));
    if node.named_child_count() == 0 {
        out.token = node.utf8_text(source).unwrap_or("").to_string();
    }
    if let Some(role) = role(kind) {
        out = out.with_role(role);
    }

    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    out.children.reserve(children.len());
    Frame {
        out,
        pending: children.into_iter(),
    }
}

fn position(byte: usize, point: tree_sitter::Point) -> Position {
    Position::new(byte as u32, point.row as u32 + 1, point.column as u32 + 1)
}

fn role(kind: &str) -> Option<Role> {
    if kind.ends_with("identifier") {
        return Some(Role::Identifier);
    }
    if kind.contains("string") || kind.contains("literal") || kind == "integer" || kind == "float"
    {
        return Some(Role::Literal);
    }
    None
}

fn is_doc_comment(raw: &str) -> bool {
    ["///", "//!", "/**", "/*!"]
        .iter()
        .any(|prefix| raw.starts_with(*prefix))
}

/// Comment text with line and block markers removed, one line per source line
pub fn strip_comment_markers(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_suffix("*/").unwrap_or(line);
            COMMENT_PREFIXES
                .iter()
                .find_map(|prefix| line.strip_prefix(*prefix))
                .unwrap_or(line)
                .trim()
        })
        .collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{parse, Language};

    #[test]
    fn test_strip_comment_markers() {
        assert_eq!(strip_comment_markers("// plain"), "plain");
        assert_eq!(strip_comment_markers("/// docs"), "docs");
        assert_eq!(strip_comment_markers("# hash"), "hash");
        assert_eq!(strip_comment_markers("/* one */"), "one");
        assert_eq!(
            strip_comment_markers("/**\n * first\n * second\n */"),
            "first\nsecond"
        );
        assert_eq!(strip_comment_markers("#!/usr/bin/env python"), "!/usr/bin/env python");
    }

    #[test]
    fn test_doc_comments_are_tagged() {
        let tree = parse(Language::Rust, "/// Adds one\nfn inc() {}\n// plain\n").unwrap();
        let docs: Vec<&str> = tree
            .iter()
            .filter(|n| n.has_role(Role::Documentation))
            .map(|n| n.token.as_str())
            .collect();
        assert_eq!(docs, vec!["Adds one"]);
    }

    #[test]
    fn test_identifiers_and_literals() {
        let tree = parse(Language::Python, "name = \"value\"\n").unwrap();
        assert!(tree
            .iter()
            .any(|n| n.has_role(Role::Identifier) && n.token == "name"));
        assert!(tree
            .iter()
            .any(|n| n.has_role(Role::Literal) && n.token.contains("value")));
    }

    #[test]
    fn test_line_comment_ends_on_its_own_line() {
        let tree = parse(Language::Rust, "// first\n\n// third\nfn f() {}\n").unwrap();
        let spans: Vec<(u32, u32)> = tree
            .iter()
            .filter(|n| n.is_comment())
            .map(|n| (n.start.unwrap().line, n.end.unwrap().line))
            .collect();
        assert_eq!(spans, vec![(1, 1), (3, 3)]);
    }

    #[test]
    fn test_multiline_comment_span() {
        let tree = parse(Language::C, "int x;\n/* one\n   two */\n").unwrap();
        let comment = tree.iter().find(|n| n.is_comment()).unwrap();
        assert_eq!(comment.token, "one\ntwo");
        assert_eq!(comment.start.map(|p| p.line), Some(2));
        assert_eq!(comment.end.map(|p| p.line), Some(3));
    }

    #[test]
    fn test_deep_nesting_fits_a_small_stack() {
        const DEPTH: usize = 2000;
        let source = format!("let x = {}{};\n", "[".repeat(DEPTH), "]".repeat(DEPTH));
        // the tree is handed back and dropped on the test thread
        let tree = std::thread::Builder::new()
            .stack_size(512 * 1024)
            .spawn(move || parse(Language::JavaScript, &source).unwrap())
            .unwrap()
            .join()
            .unwrap();
        let arrays = tree.iter().filter(|n| n.internal_type == "array").count();
        assert_eq!(arrays, DEPTH);
    }
}
