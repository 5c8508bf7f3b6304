//! Command implementations for the raml-yaml CLI
//!
//! Each command loads the input through `raml_yaml::Loader` and prints its
//! result to stdout.

pub mod dump;
pub mod paths;
pub mod unused;

use anyhow::{Context, Result};
use raml_yaml::{Loader, Yaml};
use std::path::Path;

/// Load `input`, attaching the path to any error.
pub fn load(loader: &Loader, input: &Path) -> Result<Yaml> {
    loader
        .load(input)
        .with_context(|| format!("Failed to load {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_input() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("missing.raml");

        let err = load(&Loader::default(), &input).unwrap_err();
        assert!(format!("{err:#}").contains("missing.raml"));
        assert!(matches!(
            err.downcast_ref::<raml_yaml::Error>(),
            Some(raml_yaml::Error::FileNotFound { .. })
        ));
    }
}
