//! Error types for loading and walking RAML documents.

use crate::SourceInfo;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for raml-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a document or reading it through a
/// [`crate::YamlNode`].
///
/// Any load error aborts the whole top-level load; there are no partial trees.
#[derive(Debug, Error)]
pub enum Error {
    /// A document or included file does not exist
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A file exists but could not be read
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML
    #[error("YAML syntax error at {location}: {message}")]
    Syntax {
        message: String,
        location: SourceInfo,
    },

    /// A file includes itself, directly or through other includes
    #[error("include cycle at {}: {}", path.display(), format_chain(chain))]
    IncludeCycle { path: PathBuf, chain: Vec<PathBuf> },

    /// Includes nest deeper than `LoadOptions::max_include_depth`
    #[error("includes nested deeper than {limit} levels at {}", path.display())]
    IncludeDepthExceeded { path: PathBuf, limit: usize },

    /// `!include` attached to a mapping or sequence
    #[error("!include at {location} must be applied to a scalar")]
    InvalidInclude { location: SourceInfo },

    /// Sequence index outside the sequence bounds
    #[error("index {index} out of range at '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// `arrayhash` on an element mapping with no keys
    #[error("empty mapping at '{path}' has no key to take")]
    EmptyElement { path: String },

    /// Accessor used against the wrong kind of value
    #[error("expected {expected} at '{path}', found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// YAML emitter failure
    #[error("cannot emit YAML: {0}")]
    Emit(#[from] yaml_rust2::EmitError),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
