//! `raml-yaml paths`: list every path of the resolved document.

use anyhow::Result;
use raml_yaml::{Loader, Mark, MarkTable, YamlNode};
use std::path::Path;

pub fn execute(loader: &Loader, input: &Path, json: bool) -> Result<()> {
    let yaml = super::load(loader, input)?;
    let marks = all_paths(&YamlNode::new(&yaml));

    if json {
        println!("{}", serde_json::to_string_pretty(&marks)?);
    } else {
        for (path, _) in marks.iter() {
            println!("{path}");
        }
    }
    Ok(())
}

/// Mark the whole tree and return the entries for every path below the root.
pub fn all_paths(root: &YamlNode<'_>) -> MarkTable {
    root.mark_all(Mark::USED);
    let marks = root.marks();
    let mut paths = MarkTable::new();
    for path in root.descendant_paths() {
        if let Some(kind) = marks.get(&path) {
            paths.insert(path, kind.clone());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use raml_yaml::parse;

    #[test]
    fn test_all_paths_in_document_order() {
        let yaml = parse("title: T\nresources:\n  - /a: {}\n  - /b:\n      get: ~").unwrap();
        let paths: Vec<String> = all_paths(&YamlNode::new(&yaml))
            .iter()
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "title",
                "resources",
                "resources.[0]",
                "resources.[0]./a",
                "resources.[1]",
                "resources.[1]./b",
                "resources.[1]./b.get",
            ]
        );
    }

    #[test]
    fn test_all_paths_keeps_empty_top_level_key() {
        let yaml = parse("'': {b: 1}\nb: 2").unwrap();
        let paths: Vec<String> = all_paths(&YamlNode::new(&yaml))
            .iter()
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(paths, vec!["", ".b", "b"]);
    }
}
