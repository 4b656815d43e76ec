//! Render-time resolution of `reference` nodes.
//!
//! A reference names its target either by an explicit label or by a run of
//! `+` (forward) or `-` (backward) characters counted from the nearest
//! enclosing header or list item. Anything that cannot be resolved prints
//! [`UNRESOLVED`]; a broken cross-reference never aborts rendering.

use std::collections::HashMap;

use tracing::warn;

use crate::resolve::{Anchor, AnchorKind, PositionTable, Resolved, preferred_anchor};

/// Printed for references that point nowhere.
pub const UNRESOLVED: &str = "(???)";

/// Read-only view over the lookup tables built by [`crate::resolve::resolve`].
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    labels: &'a HashMap<String, Anchor>,
    headers: &'a PositionTable,
    items: &'a PositionTable,
}

impl<'a> RefResolver<'a> {
    pub fn new(resolved: &'a Resolved) -> Self {
        Self {
            labels: &resolved.labels,
            headers: &resolved.headers,
            items: &resolved.items,
        }
    }

    /// Resolves `value` as seen from a node whose nearest enclosing header
    /// and list item are `header` and `item`.
    pub fn resolve(&self, value: &str, header: Option<&Anchor>, item: Option<&Anchor>) -> String {
        match self.target(value, header, item) {
            Some(target) => format!("({})", target.full_mark),
            None => {
                warn!(reference = value, "unresolved reference");
                UNRESOLVED.to_string()
            }
        }
    }

    fn target(
        &self,
        value: &str,
        header: Option<&Anchor>,
        item: Option<&Anchor>,
    ) -> Option<&'a Anchor> {
        if let Some(target) = self.labels.get(value) {
            return Some(target);
        }

        let offset = parse_offset(value)?;
        let origin = preferred_anchor(header, item)?;
        let position = origin.position.checked_add_signed(offset)?;
        let table = match origin.kind {
            AnchorKind::Header => self.headers,
            AnchorKind::Item => self.items,
        };
        table.get(origin.scope, position)
    }
}

/// `"++"` -> `Some(2)`, `"-"` -> `Some(-1)`; anything else -> `None`.
fn parse_offset(value: &str) -> Option<isize> {
    let value = value.trim();
    let first = value.chars().next()?;
    let sign: isize = match first {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    if !value.chars().all(|c| c == first) {
        return None;
    }
    isize::try_from(value.len()).ok().map(|n| sign * n)
}
