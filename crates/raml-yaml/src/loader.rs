//! Loading documents from disk with `!include` resolution.

use crate::include::IncludeResolver;
use crate::parser::parse_with;
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use yaml_rust2::Yaml;

/// Options for loading.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Maximum include nesting below the top-level document (default: 64).
    ///
    /// Loading fails with `Error::IncludeDepthExceeded` past this depth.
    pub max_include_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 64,
        }
    }
}

/// Loads RAML/YAML documents, resolving `!include` relative to each
/// including file.
///
/// Loading never touches the process working directory, so separate loads
/// can run on separate threads.
///
/// # Example
///
/// ```rust,no_run
/// use raml_yaml::{LoadOptions, Loader};
///
/// let loader = Loader::new(LoadOptions { max_include_depth: 8 });
/// let api = loader.load("api/main.raml").unwrap();
/// println!("{:?}", api["title"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load the document at `path` with every include resolved.
    ///
    /// # Errors
    ///
    /// Fails if this file or any file it includes is missing, unreadable, or
    /// not valid YAML, or if includes form a cycle. Nothing is returned on
    /// failure; there is no partial tree.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Yaml> {
        let mut chain = Vec::new();
        self.load_nested(path.as_ref(), &mut chain)
    }

    /// Load YAML text not backed by a file. Includes resolve against
    /// `base_dir`.
    pub fn load_str(&self, content: &str, base_dir: impl AsRef<Path>) -> Result<Yaml> {
        let mut chain = Vec::new();
        let mut resolver = IncludeResolver::new(self, base_dir.as_ref(), &mut chain);
        parse_with(content, None, &mut resolver)
    }

    pub(crate) fn load_nested(&self, path: &Path, chain: &mut Vec<PathBuf>) -> Result<Yaml> {
        let content = read_file(path)?;
        let canonical = fs::canonicalize(path).map_err(|source| io_error(path, source))?;

        if chain.contains(&canonical) {
            let mut cycle = chain.clone();
            cycle.push(canonical);
            return Err(Error::IncludeCycle {
                path: path.to_path_buf(),
                chain: cycle,
            });
        }
        if chain.len() > self.options.max_include_depth {
            return Err(Error::IncludeDepthExceeded {
                path: path.to_path_buf(),
                limit: self.options.max_include_depth,
            });
        }

        tracing::debug!(path = %path.display(), depth = chain.len(), "loading document");

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        chain.push(canonical);
        let result = {
            let mut resolver = IncludeResolver::new(self, base_dir, chain);
            parse_with(&content, Some(path), &mut resolver)
        };
        chain.pop();
        result
    }
}

/// Load the document at `path` with default options.
pub fn read_yaml(path: impl AsRef<Path>) -> Result<Yaml> {
    Loader::default().load(path)
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> Error {
    match source.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Read {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_yaml(temp.path().join("absent.raml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { ref path } if path.ends_with("absent.raml")));
    }

    #[test]
    fn test_load_str_resolves_against_base_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("desc.md"), "Long description").unwrap();

        let yaml = Loader::default()
            .load_str("description: !include desc.md", temp.path())
            .unwrap();
        assert_eq!(yaml["description"].as_str(), Some("Long description"));
    }

    #[test]
    fn test_depth_limit() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.yaml"), "next: !include b.yaml").unwrap();
        fs::write(temp.path().join("b.yaml"), "next: !include c.yaml").unwrap();
        fs::write(temp.path().join("c.yaml"), "leaf: true").unwrap();

        let shallow = Loader::new(LoadOptions {
            max_include_depth: 1,
        });
        let err = shallow.load(temp.path().join("a.yaml")).unwrap_err();
        assert!(matches!(err, Error::IncludeDepthExceeded { limit: 1, .. }));

        let deep = Loader::new(LoadOptions {
            max_include_depth: 2,
        });
        let yaml = deep.load(temp.path().join("a.yaml")).unwrap();
        assert_eq!(yaml["next"]["next"]["leaf"].as_bool(), Some(true));
    }

    #[test]
    fn test_unreadable_text_include() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(temp.path().join("api.raml"), "data: !include blob.bin").unwrap();

        let err = read_yaml(temp.path().join("api.raml")).unwrap_err();
        assert!(matches!(err, Error::Read { ref path, .. } if path.ends_with("blob.bin")));
    }
}
