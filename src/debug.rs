//! Tree dump for inspecting what the parser handed over and what the
//! resolution pass attached to it. Not part of the rendered output.

use std::fmt::Write;

use crate::ast::{Category, Node, NodeKind};

/// One line per node, indented two spaces per depth.
///
/// ```text
/// root [block]
///   header [block] pos=0 mark=1
///     text [span] "Title"
/// ```
pub fn dump_tree(root: &Node) -> String {
    let mut out = String::new();
    dump_node(root, 0, &mut out);
    out
}

fn dump_node(node: &Node, depth: usize, out: &mut String) {
    let category = match node.category() {
        Category::Block => "block",
        Category::Span => "span",
    };
    let _ = write!(out, "{}{} [{}]", "  ".repeat(depth), node.kind_name(), category);

    if let Some(pos) = node.options.relative_position {
        let _ = write!(out, " pos={pos}");
    }
    if let Some(mark) = &node.options.full_mark {
        let _ = write!(out, " mark={mark}");
    }
    if let Some(value) = payload(node) {
        let _ = write!(out, " {value:?}");
    }
    for (name, value) in &node.attr {
        let _ = write!(out, " {name}={value:?}");
    }
    out.push('\n');

    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}

fn payload(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::Text { value }
        | NodeKind::Codeblock { value }
        | NodeKind::InlineCode { value }
        | NodeKind::RawPassthrough { value }
        | NodeKind::Reference { value }
        | NodeKind::Label { value }
        | NodeKind::ActionItem { value }
        | NodeKind::IssueLink { value } => Some(value),
        _ => None,
    }
}
