//! Error types.

use thiserror::Error;

/// Failure to obtain a tree to render.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The JSON did not describe a tree of known node kinds.
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural violation detected while rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A span-category node contained a block-category child and the
    /// renderer was configured to reject such trees.
    #[error("span node `{parent}` contains block node `{child}`")]
    MalformedNesting {
        parent: &'static str,
        child: &'static str,
    },
}

/// Any failure of a full conversion.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
