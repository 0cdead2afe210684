//! Flat key/value configuration store.
//!
//! Configuration is authored as TOML; nested tables flatten to dotted
//! keys, so
//!
//! ```toml
//! [choices.plugin]
//! "dc.subject" = "lcsh"
//! ```
//!
//! yields the key `choices.plugin.dc.subject`. Scalar values are stored
//! as their string rendition; arrays of scalars are joined with commas.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Immutable flat configuration map.
#[derive(Debug, Clone, Default)]
pub struct Config {
    properties: BTreeMap<String, String>,
}

impl Config {
    /// Load and flatten a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let doc: toml::Value =
            toml::from_str(&contents).map_err(|e| ConfigError::toml(path, e))?;

        let mut properties = BTreeMap::new();
        flatten_value(&mut properties, String::new(), &doc)?;
        Ok(Self { properties })
    }

    /// Build a configuration directly from key/value pairs (tests, callers
    /// embedding the toolkit).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a single property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All keys starting with `prefix`, sorted.
    pub fn property_keys(&self, prefix: &str) -> Vec<String> {
        self.properties
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Interpret a property as a boolean. Accepts `true`/`yes`/`1` and
    /// `false`/`no`/`0` (case-insensitive); anything else, including an
    /// absent key, falls back to `default`.
    pub fn boolean_property(&self, key: &str, default: bool) -> bool {
        match self.property(key) {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            None => default,
        }
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when no properties are stored.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn flatten_value(
    out: &mut BTreeMap<String, String>,
    prefix: String,
    value: &toml::Value,
) -> Result<()> {
    match value {
        toml::Value::Table(table) => {
            for (key, inner) in table {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(out, full, inner)?;
            }
            Ok(())
        }
        toml::Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match scalar_to_string(item) {
                    Some(text) => parts.push(text),
                    None => {
                        return Err(ConfigError::InvalidConfig {
                            message: format!("key '{prefix}' holds a non-scalar array"),
                        });
                    }
                }
            }
            out.insert(prefix, parts.join(","));
            Ok(())
        }
        other => match scalar_to_string(other) {
            Some(text) => {
                out.insert(prefix, text);
                Ok(())
            }
            None => Err(ConfigError::InvalidConfig {
                message: format!("key '{prefix}' holds an unsupported value type"),
            }),
        },
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Table(_) | toml::Value::Array(_) => None,
    }
}
