//! `raml-yaml unused`: read the given paths through the tracking accessors
//! and report everything left unread.

use anyhow::{Context, Result};
use raml_yaml::{Loader, Mark, YamlNode};
use std::path::Path;

pub fn execute(loader: &Loader, input: &Path, used: &[String], subtree: &[String]) -> Result<()> {
    let yaml = super::load(loader, input)?;
    let root = YamlNode::new(&yaml);

    for path in used {
        select(&root, path).with_context(|| format!("Cannot read path '{path}'"))?;
    }
    for path in subtree {
        select(&root, path)
            .with_context(|| format!("Cannot read path '{path}'"))?
            .mark_all(Mark::USED);
    }

    let unused = root.unmarked_paths();
    tracing::info!(count = unused.len(), "unused paths");
    for path in unused {
        println!("{path}");
    }
    Ok(())
}

/// Walk a dotted path (`a.[0].b`) from `root` with the tracking accessors.
///
/// Keys that themselves contain `.` cannot be addressed.
pub fn select<'a>(root: &YamlNode<'a>, path: &str) -> raml_yaml::Result<YamlNode<'a>> {
    let mut node = root.clone();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        node = match parse_index(segment) {
            Some(index) => node.array(index)?,
            None => node.hash(segment)?,
        };
    }
    Ok(node)
}

fn parse_index(segment: &str) -> Option<usize> {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.parse().ok())
}
