//! Usage marks recorded against dotted document paths.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A kind of annotation recorded against a path.
///
/// The tracking accessors only ever record [`Mark::USED`]. Validators are free
/// to define their own kinds with [`Mark::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mark(Cow<'static, str>);

impl Mark {
    /// Recorded automatically by every accessor that descends into the tree.
    pub const USED: Mark = Mark(Cow::Borrowed("used"));
    pub const DEPRECATED: Mark = Mark(Cow::Borrowed("deprecated"));
    pub const INVALID: Mark = Mark(Cow::Borrowed("invalid"));

    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Mark(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from dotted path to the last mark recorded for it.
///
/// Entries keep the order in which paths were first marked. The table only
/// grows: a later mark replaces the kind of an existing path but entries are
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkTable {
    entries: IndexMap<String, Mark>,
}

impl MarkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind` for `path`, returning the kind it replaces.
    pub fn insert(&mut self, path: impl Into<String>, kind: Mark) -> Option<Mark> {
        self.entries.insert(path.into(), kind)
    }

    pub fn get(&self, path: &str) -> Option<&Mark> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(path, kind)` pairs in first-marked order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mark)> {
        self.entries.iter().map(|(path, kind)| (path.as_str(), kind))
    }

    /// Paths whose current mark is `kind`.
    pub fn paths_with(&self, kind: Mark) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(path, _)| path.as_str())
    }
}
