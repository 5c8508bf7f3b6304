//! Source locations for include sites and syntax errors.

use std::fmt;
use std::path::{Path, PathBuf};

/// Position of a YAML element in a loaded file.
///
/// Loads that are not backed by a file (see [`crate::Loader::load_str`])
/// carry `file: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// File the element was read from
    pub file: Option<PathBuf>,

    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,
}

impl SourceInfo {
    pub fn new(file: Option<PathBuf>, offset: usize, line: usize, col: usize) -> Self {
        Self {
            file,
            offset,
            line,
            col,
        }
    }

    /// Create a SourceInfo from a yaml-rust2 marker.
    ///
    /// yaml-rust2 lines are already 1-based, columns are 0-based.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            file: None,
            offset: marker.index(),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }

    /// Set the file for this source location.
    pub fn with_file(mut self, file: Option<&Path>) -> Self {
        self.file = file.map(Path::to_path_buf);
        self
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.col),
            None => write!(f, "<string>:{}:{}", self.line, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let info = SourceInfo::default();
        assert_eq!(info.file, None);
        assert_eq!(info.offset, 0);
        assert_eq!(info.line, 1);
        assert_eq!(info.col, 1);
    }

    #[test]
    fn test_display_with_file() {
        let info = SourceInfo::new(None, 12, 3, 7).with_file(Some(Path::new("api.raml")));
        assert_eq!(info.to_string(), "api.raml:3:7");
    }

    #[test]
    fn test_display_without_file() {
        let info = SourceInfo::new(None, 0, 2, 1);
        assert_eq!(info.to_string(), "<string>:2:1");
    }
}
