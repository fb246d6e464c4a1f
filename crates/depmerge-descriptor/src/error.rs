use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure classes produced by the descriptor patcher.
///
/// Every variant is recovered locally and surfaced to callers as a value;
/// the patcher never panics on malformed input. The `Display` rendering
/// is the reason string carried by failure events.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The descriptor file is missing or cannot be read.
    #[error("descriptor {path} not found or not readable: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// The descriptor is not well-formed XML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: quick_xml::Error,
    },

    /// The locator matched zero or more than one property element.
    #[error("unexpected number of matching nodes: {matched}")]
    Cardinality { matched: usize },

    /// The matched property element holds something other than plain
    /// character data.
    #[error("property <{property}> has unsupported content: {detail}")]
    PropertyShape { property: String, detail: String },

    /// Serializing or persisting the patched descriptor failed.
    #[error("failed to write {path}: {detail}")]
    Write { path: PathBuf, detail: String },

    /// The configured property name does not form a valid locator.
    #[error("invalid property name {name:?}: not a well-formed XML element name")]
    Locator { name: String },
}

/// Convenience alias used throughout the descriptor crate.
pub type Result<T> = std::result::Result<T, PatchError>;
