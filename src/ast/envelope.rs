use crate::ast::Node;
use serde::{Deserialize, Serialize};

/// Versioned JSON wrapper around a parsed tree.
///
/// Parsers that persist their output for later rendering write this envelope
/// so the schema and the producing parser can be checked when reloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFile {
    /// Schema version for this JSON payload.
    pub schema_version: u32,

    pub parser: ParserInfo,

    pub root: Node,
}

/// Identifies the program that produced the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserInfo {
    pub name: String,
    pub version: String,
}

/// Either an enveloped tree or a bare root node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TreeInput {
    Envelope(TreeFile),
    Bare(Node),
}

impl TreeInput {
    pub(crate) fn into_parts(self) -> (Option<u32>, Node) {
        match self {
            TreeInput::Envelope(file) => (Some(file.schema_version), file.root),
            TreeInput::Bare(node) => (None, node),
        }
    }
}
