//! Comment extraction from structural trees

use crate::uast::{Node, UastChange};
use std::collections::HashMap;

/// Return every node of `tree` accepted by `selector`, in pre-order.
pub fn extract<'a, F>(tree: &'a Node, selector: F) -> Vec<&'a Node>
where
    F: Fn(&Node) -> bool,
{
    tree.iter().filter(|n| selector(n)).collect()
}

/// Extract the nodes one changed file introduced.
///
/// A deleted file contributes nothing. Otherwise the selected nodes of the
/// new tree are returned, minus one occurrence for each node of the old tree
/// carrying the same token, so comments that merely survived the edit are not
/// counted again.
pub fn extract_change<'a, F>(change: &'a UastChange, selector: F) -> Vec<&'a Node>
where
    F: Fn(&Node) -> bool,
{
    let Some(after) = &change.after else {
        return Vec::new();
    };

    let mut old_tokens: HashMap<&str, usize> = HashMap::new();
    if let Some(before) = &change.before {
        for node in extract(before, &selector) {
            *old_tokens.entry(node.token.as_str()).or_insert(0) += 1;
        }
    }

    extract(after, &selector)
        .into_iter()
        .filter(|node| match old_tokens.get_mut(node.token.as_str()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// Extract the nodes a commit introduced, one group per changed file.
///
/// Groups follow the order of `changes`; files that introduced nothing are
/// left out. Line positions are only comparable within a group.
pub fn extract_changes<'a, F>(changes: &'a [UastChange], selector: F) -> Vec<Vec<&'a Node>>
where
    F: Fn(&Node) -> bool,
{
    changes
        .iter()
        .map(|change| extract_change(change, &selector))
        .filter(|nodes| !nodes.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uast::Role;

    fn file(comments: &[(&str, u32)]) -> Node {
        let mut root = Node::new("source_file");
        for (i, (text, line)) in comments.iter().enumerate() {
            root = root
                .with_child(Node::new("identifier").with_token(format!("x{i}")).with_role(Role::Identifier))
                .with_child(Node::comment(*text, *line, *line));
        }
        root
    }

    #[test]
    fn test_extract_returns_comments_in_traversal_order() {
        let tree = file(&[("// first", 1), ("// second", 7)]);
        let found = extract(&tree, Node::is_comment);
        let tokens: Vec<&str> = found.iter().map(|n| n.token.as_str()).collect();
        assert_eq!(tokens, vec!["// first", "// second"]);
    }

    #[test]
    fn test_extract_does_not_filter_by_position() {
        let tree = Node::new("root").with_child(
            Node::new("comment")
                .with_token("// floating")
                .with_role(Role::Comment),
        );
        assert_eq!(extract(&tree, Node::is_comment).len(), 1);
    }

    #[test]
    fn test_added_file_contributes_all_comments() {
        let changes = vec![UastChange::added("a.rs", file(&[("// one", 1), ("// two", 2)]))];
        let groups = extract_changes(&changes, Node::is_comment);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_deleted_file_contributes_nothing() {
        let changes = vec![UastChange::deleted("a.rs", file(&[("// one", 1)]))];
        assert!(extract_changes(&changes, Node::is_comment).is_empty());
    }

    #[test]
    fn test_modified_file_only_yields_new_comments() {
        let before = file(&[("// kept", 1)]);
        let after = file(&[("// kept", 1), ("// brand new", 5), ("// kept", 9)]);
        let changes = vec![UastChange::modified("a.rs", before, after)];

        let found = extract_change(&changes[0], Node::is_comment);
        let tokens: Vec<&str> = found.iter().map(|n| n.token.as_str()).collect();
        assert_eq!(tokens, vec!["// brand new", "// kept"]);
        assert_eq!(found[1].start.map(|p| p.line), Some(9));
    }

    #[test]
    fn test_changes_are_grouped_per_file() {
        let changes = vec![
            UastChange::added("app.py", file(&[("# settings", 1)])),
            UastChange::deleted("old.rs", file(&[("// gone", 1)])),
            UastChange::added("lib.rs", file(&[("// hack", 1), ("// more", 2)])),
        ];
        let groups = extract_changes(&changes, Node::is_comment);
        let tokens: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|n| n.token.as_str()).collect())
            .collect();
        assert_eq!(tokens, vec![vec!["# settings"], vec!["// hack", "// more"]]);
    }
}
