pub mod ast;
pub mod debug;
pub mod error;
pub mod render;
pub mod resolve;
pub mod width;

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

pub use error::{Error, LoadError, RenderError};
pub use render::{NestingPolicy, RenderOptions, Renderer};

use ast::{Node, TreeInput};

/// Full conversion: resolution pass, then rendering.
pub fn convert(root: Node, opts: &RenderOptions) -> Result<String, RenderError> {
    let resolved = resolve::resolve(root);
    Renderer::new(&resolved, opts).render()
}

/// Loads a tree from JSON (enveloped or bare) and converts it.
pub fn convert_json(json: &str, opts: &RenderOptions) -> Result<String, Error> {
    let root = load_tree(json)?;
    Ok(convert(root, opts)?)
}

/// Parses a tree from JSON.
///
/// Accepts either a [`ast::TreeFile`] envelope or a bare root node. Unknown
/// node kinds and envelope schema mismatches are rejected here, before any
/// rendering starts.
pub fn load_tree(json: &str) -> Result<Node, LoadError> {
    let input: TreeInput = serde_json::from_str(json)?;
    let (version, root) = input.into_parts();
    if let Some(found) = version
        && found != ast::SCHEMA_VERSION
    {
        return Err(LoadError::SchemaVersion {
            found,
            expected: ast::SCHEMA_VERSION,
        });
    }
    debug!(kind = root.kind_name(), "loaded tree");
    Ok(root)
}

/// Reads a tree from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_tree(path: Option<&Path>) -> Result<Node, LoadError> {
    let json = match path {
        Some(p) if p.as_os_str() != "-" => fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    load_tree(&json)
}
