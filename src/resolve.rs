//! Reference resolution pass.
//!
//! A single pre-order walk over the parsed tree that runs before any
//! rendering:
//! - assigns every header and every direct list item a zero-based
//!   `relative_position` within its sibling group (its *scope*),
//! - computes each one's full mark (`2.1`, `b`, `1.iii`, ...),
//! - records which header or item every `label` node names,
//! - collects headers and items into document-ordered position tables used
//!   for "N steps forward/backward" references.
//!
//! The results are written back into each node's `options` and returned
//! alongside the tree in [`Resolved`]. Nothing is consulted lazily: the
//! renderer only ever reads complete tables.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::ast::{ListStyle, Node, NodeKind};

const MAX_HEADER_LEVEL: usize = 6;

/// Which kind of addressable node an [`Anchor`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Header,
    Item,
}

/// Addressable position of a header or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub scope: usize,
    pub position: usize,
    pub full_mark: String,
}

impl Anchor {
    /// Rebuilds the anchor recorded on a resolved header or list item.
    pub fn from_node(node: &Node) -> Option<Anchor> {
        let kind = match node.kind {
            NodeKind::Header { .. } => AnchorKind::Header,
            NodeKind::ListItem => AnchorKind::Item,
            _ => return None,
        };
        let opts = &node.options;
        Some(Anchor {
            kind,
            scope: opts.scope?,
            position: opts.relative_position?,
            full_mark: opts.full_mark.clone()?,
        })
    }
}

/// Headers take precedence over list items when a node sits inside both.
pub fn preferred_anchor<'a>(
    header: Option<&'a Anchor>,
    item: Option<&'a Anchor>,
) -> Option<&'a Anchor> {
    header.or(item)
}

/// Document-ordered sequence of anchors, addressable by `(scope, position)`.
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    entries: Vec<Anchor>,
    slots: HashMap<(usize, usize), usize>,
}

impl PositionTable {
    fn push(&mut self, anchor: Anchor) {
        self.slots
            .insert((anchor.scope, anchor.position), self.entries.len());
        self.entries.push(anchor);
    }

    /// Entry at `position` within `scope`, if any.
    pub fn get(&self, scope: usize, position: usize) -> Option<&Anchor> {
        self.slots
            .get(&(scope, position))
            .and_then(|&idx| self.entries.get(idx))
    }

    /// All entries in document order.
    pub fn entries(&self) -> &[Anchor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of [`resolve`]: the annotated tree plus the lookup tables.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub root: Node,
    /// Label -> the header or item that declares it. Last definition wins.
    pub labels: HashMap<String, Anchor>,
    pub headers: PositionTable,
    pub items: PositionTable,
}

/// Runs the resolution pass over `root`.
pub fn resolve(mut root: Node) -> Resolved {
    let mut visitor = Visitor::default();
    visitor.visit_children(&mut root, &Ancestry::default());

    debug!(
        labels = visitor.labels.len(),
        headers = visitor.headers.len(),
        items = visitor.items.len(),
        "resolved references"
    );

    Resolved {
        root,
        labels: visitor.labels,
        headers: visitor.headers,
        items: visitor.items,
    }
}

#[derive(Debug, Clone, Default)]
struct Ancestry {
    header: Option<Anchor>,
    item: Option<Anchor>,
}

#[derive(Default)]
struct Visitor {
    next_scope: usize,
    labels: HashMap<String, Anchor>,
    headers: PositionTable,
    items: PositionTable,
}

impl Visitor {
    fn new_scope(&mut self) -> usize {
        let id = self.next_scope;
        self.next_scope += 1;
        id
    }

    fn visit_children(&mut self, parent: &mut Node, ancestry: &Ancestry) {
        merge_text_runs(&mut parent.children);

        let list_style = match parent.kind {
            NodeKind::UnorderedList => Some((ListStyle::Decimal, 1)),
            NodeKind::OrderedList { style, start } => Some((style, start)),
            _ => None,
        };
        let item_scope = list_style.map(|_| self.new_scope());
        let mut header_scope: Option<usize> = None;
        let mut header_count = 0usize;
        let mut item_count = 0usize;
        let mut outline = [0usize; MAX_HEADER_LEVEL];

        for child in &mut parent.children {
            match &child.kind {
                NodeKind::Header { level, mark } => {
                    let scope = *header_scope.get_or_insert_with(|| self.new_scope());
                    let full_mark = outline_mark(&mut outline, *level, mark.as_deref());
                    let anchor = Anchor {
                        kind: AnchorKind::Header,
                        scope,
                        position: header_count,
                        full_mark,
                    };
                    header_count += 1;
                    annotate(child, &anchor);
                    self.headers.push(anchor.clone());

                    let inner = Ancestry {
                        header: Some(anchor),
                        item: ancestry.item.clone(),
                    };
                    self.visit_children(child, &inner);
                }
                NodeKind::ListItem if item_scope.is_some() => {
                    let (style, start) = list_style.unwrap_or((ListStyle::Decimal, 1));
                    let segment = style.format(start.saturating_add(item_count));
                    let full_mark = match &ancestry.item {
                        Some(parent_item) => format!("{}.{}", parent_item.full_mark, segment),
                        None => segment,
                    };
                    let anchor = Anchor {
                        kind: AnchorKind::Item,
                        scope: item_scope.unwrap_or_default(),
                        position: item_count,
                        full_mark,
                    };
                    item_count += 1;
                    annotate(child, &anchor);
                    self.items.push(anchor.clone());

                    let inner = Ancestry {
                        header: ancestry.header.clone(),
                        item: Some(anchor),
                    };
                    self.visit_children(child, &inner);
                }
                NodeKind::Label { value } => {
                    self.capture_label(value, ancestry);
                }
                _ => self.visit_children(child, ancestry),
            }
        }
    }

    fn capture_label(&mut self, label: &str, ancestry: &Ancestry) {
        let Some(target) = preferred_anchor(ancestry.header.as_ref(), ancestry.item.as_ref())
        else {
            debug!(label, "label outside any header or list item; ignored");
            return;
        };
        if let Some(previous) = self.labels.insert(label.to_string(), target.clone()) {
            warn!(
                label,
                previous = %previous.full_mark,
                current = %target.full_mark,
                "label redefined; later definition wins"
            );
        }
    }
}

fn annotate(node: &mut Node, anchor: &Anchor) {
    node.options.relative_position = Some(anchor.position);
    node.options.scope = Some(anchor.scope);
    node.options.full_mark = Some(anchor.full_mark.clone());
}

/// Advances the per-level outline counters for a header and returns its mark.
fn outline_mark(outline: &mut [usize; MAX_HEADER_LEVEL], level: u8, own: Option<&str>) -> String {
    let idx = usize::from(level).clamp(1, MAX_HEADER_LEVEL) - 1;
    outline[idx] += 1;
    for deeper in &mut outline[idx + 1..] {
        *deeper = 0;
    }

    let first = outline[..idx].iter().position(|&n| n != 0).unwrap_or(idx);
    let mut segments: Vec<String> = outline[first..=idx].iter().map(|n| n.to_string()).collect();
    if let (Some(own), Some(last)) = (own, segments.last_mut()) {
        *last = own.to_string();
    }
    segments.join(".")
}

/// Merges adjacent plain text siblings and drops empty ones.
fn merge_text_runs(children: &mut Vec<Node>) {
    if children.len() < 2 && !children.iter().any(is_empty_text) {
        return;
    }
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for child in children.drain(..) {
        if is_empty_text(&child) {
            continue;
        }
        if let (
            NodeKind::Text { value },
            Some(Node {
                kind: NodeKind::Text { value: prev },
                ..
            }),
        ) = (&child.kind, merged.last_mut())
            && child.attr.is_empty()
        {
            prev.push_str(value);
            continue;
        }
        merged.push(child);
    }
    *children = merged;
}

fn is_empty_text(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Text { value } if value.is_empty())
}
