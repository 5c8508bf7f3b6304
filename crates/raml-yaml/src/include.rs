//! `!include` resolution.
//!
//! The argument of an `!include` tag names another file relative to the
//! directory of the document that contains the tag. What happens to it
//! depends only on the argument's spelling:
//!
//! - `http://` / `https://` URLs resolve to an empty string; remote loading
//!   is not supported.
//! - `.raml`, `.yaml` and `.yml` files are loaded as documents, with their own
//!   includes resolved against their own directory.
//! - anything else is spliced in as the file's raw text.

use crate::loader::{Loader, read_file};
use crate::parser::TagHandler;
use crate::{Result, SourceInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use yaml_rust2::Yaml;

/// Tag suffix of the include directive (`!include`).
pub const INCLUDE_TAG: &str = "include";

static REMOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());
static DOCUMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(raml|ya?ml)$").unwrap());

/// How an include argument is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Remote,
    Document,
    Text,
}

impl IncludeKind {
    pub fn classify(argument: &str) -> Self {
        if REMOTE.is_match(argument) {
            IncludeKind::Remote
        } else if DOCUMENT.is_match(argument) {
            IncludeKind::Document
        } else {
            IncludeKind::Text
        }
    }
}

/// Tag handler resolving `!include` for one document.
///
/// `base_dir` is the directory of the document being parsed. `chain` holds
/// the canonical paths of every document currently being loaded, outermost
/// first, and is shared with nested loads.
pub(crate) struct IncludeResolver<'l> {
    loader: &'l Loader,
    base_dir: &'l Path,
    chain: &'l mut Vec<PathBuf>,
}

impl<'l> IncludeResolver<'l> {
    pub(crate) fn new(loader: &'l Loader, base_dir: &'l Path, chain: &'l mut Vec<PathBuf>) -> Self {
        Self {
            loader,
            base_dir,
            chain,
        }
    }

    fn resolve(&mut self, argument: &str, location: &SourceInfo) -> Result<Yaml> {
        let kind = IncludeKind::classify(argument);
        if kind == IncludeKind::Remote {
            tracing::warn!(url = argument, at = %location, "remote includes are not supported");
            return Ok(Yaml::String(String::new()));
        }

        let path = self.base_dir.join(argument);
        tracing::debug!(
            path = %path.display(),
            base = %self.base_dir.display(),
            ?kind,
            "resolving include"
        );

        match kind {
            IncludeKind::Document => self.loader.load_nested(&path, self.chain),
            _ => read_file(&path).map(Yaml::String),
        }
    }
}

impl TagHandler for IncludeResolver<'_> {
    fn handle_scalar(
        &mut self,
        tag: &str,
        argument: &str,
        location: &SourceInfo,
    ) -> Option<Result<Yaml>> {
        (tag == INCLUDE_TAG).then(|| self.resolve(argument, location))
    }

    fn handles(&self, tag: &str) -> bool {
        tag == INCLUDE_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_remote() {
        assert_eq!(
            IncludeKind::classify("https://example.com/api.raml"),
            IncludeKind::Remote
        );
        assert_eq!(
            IncludeKind::classify("http://example.com/schema.json"),
            IncludeKind::Remote
        );
    }

    #[test]
    fn test_classify_documents() {
        for argument in ["types.raml", "sub/dir/traits.yaml", "x.yml"] {
            assert_eq!(IncludeKind::classify(argument), IncludeKind::Document, "{argument}");
        }
    }

    #[test]
    fn test_classify_text() {
        for argument in ["schema.json", "notes.md", "example.yaml.txt", "ftp://host/x.raml.bak"] {
            assert_eq!(IncludeKind::classify(argument), IncludeKind::Text, "{argument}");
        }
    }

    #[test]
    fn test_remote_include_is_empty_text() {
        let loader = Loader::default();
        let mut chain = Vec::new();
        let mut resolver = IncludeResolver::new(&loader, Path::new("."), &mut chain);
        let value = resolver
            .handle_scalar(INCLUDE_TAG, "https://example.com/a.raml", &SourceInfo::default())
            .unwrap()
            .unwrap();
        assert_eq!(value, Yaml::String(String::new()));
    }

    #[test]
    fn test_other_tags_not_handled() {
        let loader = Loader::default();
        let mut chain = Vec::new();
        let mut resolver = IncludeResolver::new(&loader, Path::new("."), &mut chain);
        assert!(!resolver.handles("path"));
        assert!(
            resolver
                .handle_scalar("path", "a.txt", &SourceInfo::default())
                .is_none()
        );
    }
}
