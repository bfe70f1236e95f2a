//! Declarative binding configuration.
//!
//! ```toml
//! [bindings]
//! logger = "console"
//! store = "memory"
//! ```
//!
//! Each entry selects, for a dependency key, one of the implementations
//! offered under that key in a [`Catalog`](crate::Catalog).

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::RegistryError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Dependency key -> implementation key.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl BindingConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded binding configuration");
        Self::from_toml_str(&source)
    }

    /// Add or replace a selection in code, e.g. to override a file setting.
    pub fn select(
        &mut self,
        dependency: impl Into<String>,
        implementation: impl Into<String>,
    ) -> &mut Self {
        self.bindings.insert(dependency.into(), implementation.into());
        self
    }
}

impl FromStr for BindingConfig {
    type Err = RegistryError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(source)
    }
}
