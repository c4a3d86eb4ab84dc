//! Structural source trees
//!
//! A language-neutral tree of typed nodes carrying role tags and source
//! positions. Parsers in [`crate::parsers`] build these from tree-sitter
//! syntax trees; the sentiment analysis only ever reads them.

use serde::{Deserialize, Serialize};

/// Semantic role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Comment,
    Documentation,
    Identifier,
    Literal,
    Other,
}

/// Source position. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Position on a line, column 1
    pub fn line(line: u32) -> Self {
        Self {
            offset: 0,
            line,
            col: 1,
        }
    }
}

/// A node of a structural tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Node {
    /// Grammar-specific node kind (e.g. `line_comment`, `function_item`)
    pub internal_type: String,
    /// Source text for leaves and comments, empty otherwise
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub start: Option<Position>,
    #[serde(default)]
    pub end: Option<Position>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(internal_type: impl Into<String>) -> Self {
        Self {
            internal_type: internal_type.into(),
            ..Default::default()
        }
    }

    /// Comment leaf spanning `start_line..=end_line`
    pub fn comment(token: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            internal_type: "comment".to_string(),
            token: token.into(),
            roles: vec![Role::Comment],
            start: Some(Position::line(start_line)),
            end: Some(Position::line(end_line)),
            children: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn with_span(mut self, start: Option<Position>, end: Option<Position>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_comment(&self) -> bool {
        self.has_role(Role::Comment)
    }

    /// Pre-order traversal, self first
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        self.iter().count()
    }
}

/// Pre-order iterator over a [`Node`] subtree
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Structural change of one file within a commit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UastChange {
    /// Repository-relative path of the file (new path for renames)
    pub path: String,
    /// Tree of the previous state, `None` for added files
    pub before: Option<Node>,
    /// Tree of the new state, `None` for deleted files
    pub after: Option<Node>,
}

impl UastChange {
    pub fn added(path: impl Into<String>, after: Node) -> Self {
        Self {
            path: path.into(),
            before: None,
            after: Some(after),
        }
    }

    pub fn modified(path: impl Into<String>, before: Node, after: Node) -> Self {
        Self {
            path: path.into(),
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn deleted(path: impl Into<String>, before: Node) -> Self {
        Self {
            path: path.into(),
            before: Some(before),
            after: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder_visits_parent_before_children_in_order() {
        let tree = Node::new("file")
            .with_child(Node::new("a").with_child(Node::new("a1")))
            .with_child(Node::new("b"));

        let kinds: Vec<&str> = tree.iter().map(|n| n.internal_type.as_str()).collect();
        assert_eq!(kinds, vec!["file", "a", "a1", "b"]);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_comment_constructor() {
        let node = Node::comment("// hi", 3, 4);
        assert!(node.is_comment());
        assert_eq!(node.start.map(|p| p.line), Some(3));
        assert_eq!(node.end.map(|p| p.line), Some(4));
    }

    #[test]
    fn test_with_role_deduplicates() {
        let node = Node::new("x").with_role(Role::Literal).with_role(Role::Literal);
        assert_eq!(node.roles, vec![Role::Literal]);
    }
}
