//! Configuration reader contract and a JSON-backed implementation.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfigError;

/// Reads named configuration sections.
///
/// Section names are dot-separated paths such as `jobs.pipelines.test-1`.
/// A top-level key containing dots (`my.queue`) is matched as is first.
pub trait Configurer: Send + Sync {
    /// Return the raw section stored under `name`.
    fn unmarshal_key(&self, name: &str) -> Result<Value, ConfigError>;

    /// Whether a non-null section exists under `name`.
    fn has(&self, name: &str) -> bool;
}

impl dyn Configurer {
    /// Deserialize the section stored under `name` into `T`.
    pub fn unmarshal_key_into<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.unmarshal_key(name)?;
        serde_json::from_value(value).map_err(ConfigError::from)
    }
}

/// [`Configurer`] over an in-memory JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    root: Value,
}

impl JsonConfig {
    /// Wrap an already parsed document.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a JSON document from a string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Read and parse a JSON document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        let node = if name.is_empty() {
            Some(&self.root)
        } else if let Some(exact) = self.root.get(name) {
            Some(exact)
        } else {
            name.split('.')
                .try_fold(&self.root, |node, part| node.get(part))
        };
        node.filter(|value| !value.is_null())
    }
}

impl Configurer for JsonConfig {
    fn unmarshal_key(&self, name: &str) -> Result<Value, ConfigError> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
