//! Usage-tracking view over a loaded YAML tree.
//!
//! A [`YamlNode`] pairs a raw `Yaml` value with its position in the tree.
//! Reading the document through the typed accessors (`hash`, `array`,
//! `arrayhash` and their `_values` forms) records a [`Mark::USED`] entry for
//! every path visited in the root's [`MarkTable`]. After a validator has
//! walked the tree, [`YamlNode::unmarked_paths`] lists everything it never
//! looked at.
//!
//! ```rust
//! use raml_yaml::{Mark, YamlNode, parse};
//!
//! let yaml = parse("title: Example\nversion: v1\nbogus: 1").unwrap();
//! let root = YamlNode::new(&yaml);
//! assert_eq!(root.hash("title").unwrap().as_str(), Some("Example"));
//! root.hash("version").unwrap();
//!
//! assert_eq!(root.marks().get("title"), Some(&Mark::USED));
//! assert_eq!(root.unmarked_paths(), vec!["bogus".to_string()]);
//! ```

use crate::marks::{Mark, MarkTable};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use yaml_rust2::{Yaml, YamlEmitter};

/// A YAML value together with its tree position.
///
/// Nodes are cheap and short-lived: accessors build a fresh child each time
/// they are called. Values are borrowed from the loaded tree; only a value
/// substituted by [`YamlNode::or_default`] is owned.
#[derive(Debug, Clone)]
pub struct YamlNode<'a> {
    position: Position<'a>,
    value: Cow<'a, Yaml>,
}

#[derive(Debug, Clone)]
enum Position<'a> {
    /// The mark table lives here and nowhere else.
    Root {
        key: Option<String>,
        marks: Rc<RefCell<MarkTable>>,
    },
    Child {
        parent: Rc<YamlNode<'a>>,
        key: String,
    },
}

impl<'a> YamlNode<'a> {
    /// Wrap a document root. The root path is empty.
    pub fn new(value: &'a Yaml) -> Self {
        Self::root_node(None, Cow::Borrowed(value))
    }

    /// Wrap a document root whose path is `key`.
    pub fn with_key(key: impl Into<String>, value: &'a Yaml) -> Self {
        Self::root_node(Some(key.into()), Cow::Borrowed(value))
    }

    fn root_node(key: Option<String>, value: Cow<'a, Yaml>) -> Self {
        Self {
            position: Position::Root {
                key,
                marks: Rc::new(RefCell::new(MarkTable::new())),
            },
            value,
        }
    }

    fn child_of(parent: &Rc<YamlNode<'a>>, key: String, value: Cow<'a, Yaml>) -> Self {
        Self {
            position: Position::Child {
                parent: Rc::clone(parent),
                key,
            },
            value,
        }
    }

    pub fn value(&self) -> &Yaml {
        &self.value
    }

    /// The key this node was reached by; `[i]` for sequence elements.
    pub fn key(&self) -> Option<&str> {
        match &self.position {
            Position::Root { key, .. } => key.as_deref(),
            Position::Child { key, .. } => Some(key.as_str()),
        }
    }

    pub fn parent(&self) -> Option<&YamlNode<'a>> {
        match &self.position {
            Position::Root { .. } => None,
            Position::Child { parent, .. } => Some(parent.as_ref()),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.position, Position::Root { .. })
    }

    /// True for null values and for keys that were absent.
    pub fn is_null(&self) -> bool {
        matches!(*self.value, Yaml::Null | Yaml::BadValue)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    /// The topmost node of the chain this node was reached through.
    pub fn root(&self) -> &YamlNode<'a> {
        match &self.position {
            Position::Root { .. } => self,
            Position::Child { parent, .. } => parent.root(),
        }
    }

    /// Dotted path from the root, e.g. `resources.[0].get`.
    pub fn path(&self) -> String {
        match &self.position {
            Position::Root { key, .. } => key.clone().unwrap_or_default(),
            Position::Child { parent, key } => join_path(parent.child_prefix().as_deref(), key),
        }
    }

    /// Path that children extend; `None` only for an unkeyed root, whose
    /// children start the path without a separator.
    fn child_prefix(&self) -> Option<String> {
        match &self.position {
            Position::Root { key, .. } => key.clone(),
            Position::Child { .. } => Some(self.path()),
        }
    }

    /// Record `kind` for this node's path.
    pub fn mark(&self, kind: Mark) -> &Self {
        self.mark_path(kind, self.path())
    }

    /// Record `kind` for `path` in the root's table.
    ///
    /// Non-root nodes hand the call to their parent unchanged.
    pub fn mark_path(&self, kind: Mark, path: impl Into<String>) -> &Self {
        match &self.position {
            Position::Root { marks, .. } => {
                marks.borrow_mut().insert(path, kind);
            }
            Position::Child { parent, .. } => {
                parent.mark_path(kind, path);
            }
        }
        self
    }

    /// Mark this node and every node below it with `kind`.
    pub fn mark_all(&self, kind: Mark) -> &Self {
        self.mark(kind.clone());
        let children = self.children();
        if !children.is_empty() {
            let parent = Rc::new(self.clone());
            for (key, value) in children {
                Self::child_of(&parent, key, value).mark_all(kind.clone());
            }
        }
        self
    }

    /// A copy of the root's mark table.
    pub fn marks(&self) -> MarkTable {
        self.table().borrow().clone()
    }

    fn table(&self) -> &Rc<RefCell<MarkTable>> {
        match &self.position {
            Position::Root { marks, .. } => marks,
            Position::Child { parent, .. } => parent.table(),
        }
    }

    /// Replace a null value with `default`, keeping the position.
    ///
    /// Substitution alone does not mark the path.
    pub fn or_default(self, default: Yaml) -> Self {
        if self.is_null() {
            Self {
                position: self.position,
                value: Cow::Owned(default),
            }
        } else {
            self
        }
    }

    /// Sequence element `index`, marked used.
    pub fn array(&self, index: usize) -> Result<YamlNode<'a>> {
        self.expect_array()?;
        Self::element(&Rc::new(self.clone()), index)
    }

    /// Apply `transform` to every sequence element in order. Null reads as
    /// an empty sequence.
    pub fn array_values<T>(&self, mut transform: impl FnMut(YamlNode<'a>) -> T) -> Result<Vec<T>> {
        let len = match self.expect_array_or_null()? {
            Some(items) => items.len(),
            None => return Ok(Vec::new()),
        };
        let parent = Rc::new(self.clone());
        (0..len)
            .map(|index| Self::element(&parent, index).map(&mut transform))
            .collect()
    }

    /// Mapping value for `key`, marked used. An absent key yields a null
    /// child rather than an error.
    ///
    /// Keys are compared by their rendered form, so `hash("200")` finds an
    /// integer key `200`.
    pub fn hash(&self, key: &str) -> Result<YamlNode<'a>> {
        self.expect_hash()?;
        let value = self.project(|v| lookup(v, key));
        let node = Self::child_of(&Rc::new(self.clone()), key.to_string(), value);
        node.mark(Mark::USED);
        Ok(node)
    }

    /// Apply `transform` to every mapping value in insertion order. Null
    /// reads as an empty mapping.
    pub fn hash_values<T>(
        &self,
        mut transform: impl FnMut(YamlNode<'a>) -> T,
    ) -> Result<IndexMap<String, T>> {
        if self.expect_hash_or_null()?.is_none() {
            return Ok(IndexMap::new());
        }
        let parent = Rc::new(self.clone());
        Ok(self
            .children()
            .into_iter()
            .map(|(key, value)| {
                let node = Self::child_of(&parent, key.clone(), value);
                node.mark(Mark::USED);
                (key, transform(node))
            })
            .collect())
    }

    /// For a sequence of single-entry mappings: marks element `index` used,
    /// then returns its first entry's value, also marked used.
    ///
    /// Only the first key counts; any further keys in the element are
    /// ignored.
    pub fn arrayhash(&self, index: usize) -> Result<YamlNode<'a>> {
        self.expect_array()?;
        Self::first_entry(Self::element(&Rc::new(self.clone()), index)?)
    }

    /// `arrayhash` across the whole sequence, keyed by each element's first
    /// key in sequence order. Null reads as an empty sequence.
    pub fn arrayhash_values<T>(
        &self,
        mut transform: impl FnMut(YamlNode<'a>) -> T,
    ) -> Result<IndexMap<String, T>> {
        let len = match self.expect_array_or_null()? {
            Some(items) => items.len(),
            None => return Ok(IndexMap::new()),
        };
        let parent = Rc::new(self.clone());
        let mut values = IndexMap::with_capacity(len);
        for index in 0..len {
            let node = Self::first_entry(Self::element(&parent, index)?)?;
            let key = node.key().unwrap_or_default().to_string();
            values.insert(key, transform(node));
        }
        Ok(values)
    }

    /// Every path below this node, in document order. Nothing is marked.
    pub fn descendant_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&self.value, self.child_prefix().as_deref(), &mut paths);
        paths
    }

    /// Every path below the root that has no mark, in document order.
    pub fn unmarked_paths(&self) -> Vec<String> {
        let mut paths = self.root().descendant_paths();
        let marks = self.table().borrow();
        paths.retain(|path| !marks.contains(path));
        paths
    }

    fn element(parent: &Rc<YamlNode<'a>>, index: usize) -> Result<YamlNode<'a>> {
        let len = parent.value.as_vec().map_or(0, Vec::len);
        if index >= len {
            return Err(Error::IndexOutOfRange {
                path: parent.path(),
                index,
                len,
            });
        }
        let value = parent.project(|v| v.as_vec().and_then(|items| items.get(index)));
        let node = Self::child_of(parent, index_key(index), value);
        node.mark(Mark::USED);
        Ok(node)
    }

    fn first_entry(element: YamlNode<'a>) -> Result<YamlNode<'a>> {
        let key = match &*element.value {
            Yaml::Hash(entries) => entries.keys().next().map(render_key),
            other => {
                return Err(Error::TypeMismatch {
                    path: element.path(),
                    expected: "mapping",
                    found: kind_name(other),
                });
            }
        };
        let Some(key) = key else {
            return Err(Error::EmptyElement {
                path: element.path(),
            });
        };
        let value = element.project(|v| v.as_hash().and_then(|entries| entries.values().next()));
        let node = Self::child_of(&Rc::new(element), key, value);
        node.mark(Mark::USED);
        Ok(node)
    }

    /// Select a sub-value, borrowing from the loaded tree when possible.
    fn project(&self, select: impl for<'y> Fn(&'y Yaml) -> Option<&'y Yaml>) -> Cow<'a, Yaml> {
        match &self.value {
            Cow::Borrowed(value) => {
                let value: &'a Yaml = *value;
                select(value).map_or(Cow::Owned(Yaml::Null), Cow::Borrowed)
            }
            Cow::Owned(value) => Cow::Owned(select(value).cloned().unwrap_or(Yaml::Null)),
        }
    }

    /// Keyed children of a mapping or sequence; empty for scalars.
    fn children(&self) -> Vec<(String, Cow<'a, Yaml>)> {
        match &self.value {
            Cow::Borrowed(value) => {
                let value: &'a Yaml = *value;
                match value {
                    Yaml::Hash(entries) => entries
                        .iter()
                        .map(|(k, v)| (render_key(k), Cow::Borrowed(v)))
                        .collect(),
                    Yaml::Array(items) => items
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (index_key(i), Cow::Borrowed(v)))
                        .collect(),
                    _ => Vec::new(),
                }
            }
            Cow::Owned(value) => match value {
                Yaml::Hash(entries) => entries
                    .iter()
                    .map(|(k, v)| (render_key(k), Cow::Owned(v.clone())))
                    .collect(),
                Yaml::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (index_key(i), Cow::Owned(v.clone())))
                    .collect(),
                _ => Vec::new(),
            },
        }
    }

    fn expect_array(&self) -> Result<&Vec<Yaml>> {
        self.value.as_vec().ok_or_else(|| self.mismatch("sequence"))
    }

    fn expect_array_or_null(&self) -> Result<Option<&Vec<Yaml>>> {
        if self.is_null() {
            return Ok(None);
        }
        self.expect_array().map(Some)
    }

    fn expect_hash(&self) -> Result<&yaml_rust2::yaml::Hash> {
        self.value.as_hash().ok_or_else(|| self.mismatch("mapping"))
    }

    fn expect_hash_or_null(&self) -> Result<Option<&yaml_rust2::yaml::Hash>> {
        if self.is_null() {
            return Ok(None);
        }
        self.expect_hash().map(Some)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            path: self.path(),
            expected,
            found: kind_name(&self.value),
        }
    }
}

fn join_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{key}"),
        None => key.to_string(),
    }
}

fn index_key(index: usize) -> String {
    format!("[{index}]")
}

fn lookup<'y>(value: &'y Yaml, key: &str) -> Option<&'y Yaml> {
    let entries = value.as_hash()?;
    entries
        .get(&Yaml::String(key.to_string()))
        .or_else(|| {
            entries
                .iter()
                .find(|(k, _)| render_key(k) == key)
                .map(|(_, v)| v)
        })
}

fn collect_paths(value: &Yaml, path: Option<&str>, out: &mut Vec<String>) {
    match value {
        Yaml::Hash(entries) => {
            for (key, child) in entries {
                let child_path = join_path(path, &render_key(key));
                out.push(child_path.clone());
                collect_paths(child, Some(&child_path), out);
            }
        }
        Yaml::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_path = join_path(path, &index_key(index));
                out.push(child_path.clone());
                collect_paths(child, Some(&child_path), out);
            }
        }
        _ => {}
    }
}

/// Text form of a mapping key as it appears in paths.
pub(crate) fn render_key(key: &Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null | Yaml::BadValue => "~".to_string(),
        Yaml::Alias(id) => format!("*{id}"),
        Yaml::Hash(_) | Yaml::Array(_) => {
            let mut out = String::new();
            let dumped = {
                let mut emitter = YamlEmitter::new(&mut out);
                emitter.compact(true);
                emitter.dump(key)
            };
            match dumped {
                Ok(()) => out
                    .trim_start_matches("---")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
                Err(_) => String::new(),
            }
        }
    }
}

pub(crate) fn kind_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Hash(_) => "mapping",
        Yaml::Array(_) => "sequence",
        Yaml::String(_) => "string",
        Yaml::Integer(_) => "integer",
        Yaml::Real(_) => "real",
        Yaml::Boolean(_) => "boolean",
        Yaml::Null => "null",
        Yaml::Alias(_) => "alias",
        Yaml::BadValue => "missing value",
    }
}
