//! # raml-yaml
//!
//! Loading of RAML documents with `!include` resolution, plus a
//! usage-tracking view over the loaded tree.
//!
//! Documents load into plain `yaml_rust2::Yaml` trees. Includes are resolved
//! during parsing, relative to the directory of the file that contains them.
//! Wrapping the result in a [`YamlNode`] and reading it only through the node's
//! accessors records which paths were consulted, so a validator can report
//! the fields it never recognized.
//!
//! ## Example
//!
//! ```rust,no_run
//! use raml_yaml::{YamlNode, read_yaml};
//!
//! let api = read_yaml("api.raml").unwrap();
//! let root = YamlNode::new(&api);
//!
//! let title = root.hash("title").unwrap();
//! let resources = root.hash("resources").unwrap().hash_values(|r| r.path()).unwrap();
//!
//! for path in root.unmarked_paths() {
//!     eprintln!("unknown field: {path}");
//! }
//! # let _ = (title, resources);
//! ```

mod dump;
mod error;
mod include;
mod loader;
mod marks;
mod node;
mod parser;
mod source_info;

pub use dump::dump_yaml;
pub use error::{Error, Result};
pub use include::{INCLUDE_TAG, IncludeKind};
pub use loader::{LoadOptions, Loader, read_yaml};
pub use marks::{Mark, MarkTable};
pub use node::YamlNode;
pub use parser::{NoTags, TagHandler, parse, parse_with};
pub use source_info::SourceInfo;

// Re-export so callers need not depend on yaml-rust2 directly
pub use yaml_rust2::Yaml;
