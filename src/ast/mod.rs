//! Parsed document tree and its JSON envelope.
//!
//! This module defines the **contract** between:
//! 1) the external markdown parser, which produces a `Node` tree, and
//! 2) rendering that tree -> fixed-width plain text.
//!
//! The node taxonomy is closed. Anything the parser emits must map onto one
//! of the `NodeKind` variants; a tree naming an unknown kind fails to load.

mod envelope;
mod marks;
mod nodes;

pub use envelope::*;
pub use marks::*;
pub use nodes::*;

/// JSON schema version for the tree envelope.
///
/// Bump this when making non-backwards-compatible changes to the JSON structure.
pub const SCHEMA_VERSION: u32 = 1;
