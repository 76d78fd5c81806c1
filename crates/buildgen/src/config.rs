//! `configurations.yaml` loading.
//!
//! The configuration is a flat YAML mapping of variable names to directory
//! paths. Document order is preserved: generated variable lines come out
//! in the same order the user wrote them.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::Error;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "configurations.yaml";

/// Reserved key naming the ARM cross-toolchain directory; its listing is
/// scanned for the cross compiler.
pub const ARM_TOOLS_KEY: &str = "ARM_TOOLS_DIR";

/// Derived key under which the discovered compiler prefix is emitted.
pub const EABI_PREFIX_KEY: &str = "EABI_PREFIX";

/// Key naming the CMake install directory, referenced by the Windows build
/// script.
pub const CMAKE_PATH_KEY: &str = "CLION_CMAKE_PATH";

/// Key naming the MinGW install directory, referenced by the Windows build
/// script.
pub const MINGW_PATH_KEY: &str = "MINGW_ENV_PATH";

/// Ordered key/value mapping loaded from `configurations.yaml`.
///
/// Read once at the start of a run and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Configuration {
    entries: Vec<(String, String)>,
}

impl Configuration {
    /// Load and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the file is unreadable, parses
    /// to an empty document, is not a mapping, or contains a non-string
    /// key or value.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::Configuration {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|reason| Error::Configuration {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a YAML document into an ordered mapping.
    fn parse(text: &str) -> Result<Self, String> {
        let doc: Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        let mapping = match doc {
            Value::Null => return Err("document is empty".to_owned()),
            Value::Mapping(m) => m,
            other => {
                return Err(format!(
                    "expected a key/value mapping, found {}",
                    value_kind(&other)
                ))
            }
        };
        if mapping.is_empty() {
            return Err("document is empty".to_owned());
        }

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = match key {
                Value::String(k) => k,
                other => return Err(format!("non-string key ({})", value_kind(&other))),
            };
            let value = match value {
                Value::String(v) => v,
                other => {
                    return Err(format!(
                        "value of `{key}` is not a string (found {})",
                        value_kind(&other)
                    ))
                }
            };
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    /// Iterate `(key, value)` pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of configured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no entries. Never true for a loaded
    /// configuration: an empty document fails to load.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
