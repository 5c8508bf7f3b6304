//! `raml-yaml dump`: print the resolved document.

use anyhow::Result;
use raml_yaml::{Loader, dump_yaml};
use std::path::Path;

pub fn execute(loader: &Loader, input: &Path) -> Result<()> {
    let yaml = super::load(loader, input)?;
    print!("{}", dump_yaml(&yaml)?);
    Ok(())
}
