//! Serializing resolved trees back to YAML text.

use crate::Result;
use yaml_rust2::{Yaml, YamlEmitter};

/// Emit `yaml` as a YAML document.
///
/// Includes were already spliced in by the loader, so the output is
/// self-contained.
pub fn dump_yaml(yaml: &Yaml) -> Result<String> {
    let mut out = String::new();
    {
        let mut emitter = YamlEmitter::new(&mut out);
        emitter.dump(yaml)?;
    }
    out.push('\n');
    Ok(out)
}
