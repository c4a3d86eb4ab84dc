//! Merging of vertically contiguous comment nodes
//!
//! A `//` block spread over several physical lines is one utterance, so
//! comment nodes are grouped by line and consecutive lines are joined before
//! anything gets filtered or scored.

use crate::uast::Node;
use std::collections::BTreeMap;

/// Merge comment nodes into one string per contiguous line run.
///
/// Nodes without a start position are dropped. Nodes sharing a line keep
/// their input order. A run continues while the next line is at most one
/// past the furthest end line seen on the current line.
pub fn merge_comments(nodes: &[&Node]) -> Vec<String> {
    let mut lines: BTreeMap<u32, Vec<&Node>> = BTreeMap::new();
    for &node in nodes {
        let Some(start) = node.start else {
            continue;
        };
        lines.entry(start.line).or_default().push(node);
    }

    let line_nums: Vec<u32> = lines.keys().copied().collect();
    let mut merged = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for (i, line) in line_nums.iter().enumerate() {
        let mut max_end = *line;
        for node in &lines[line] {
            if let Some(end) = node.end {
                max_end = max_end.max(end.line);
            }
            let token = node.token.trim();
            if !token.is_empty() {
                buffer.push(token);
            }
        }

        if let Some(next) = line_nums.get(i + 1) {
            if *next <= max_end.saturating_add(1) {
                continue;
            }
        }
        merged.push(buffer.join("\n"));
        buffer.clear();
    }

    merged
}
