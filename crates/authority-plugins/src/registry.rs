//! Explicit name-to-plugin table.
//!
//! Replaces runtime plugin discovery with a map populated at process
//! startup: embedders register their backends by name, and the broker
//! adds auto-built value-pairs and vocabulary backends for every name
//! the submission forms reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::authority::ChoiceAuthority;

/// Mapping from authority name to a constructed backend.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn ChoiceAuthority>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under `name`, replacing any previous binding.
    pub fn register(&mut self, name: impl Into<String>, plugin: Arc<dyn ChoiceAuthority>) {
        let name = name.into();
        if self.plugins.insert(name.clone(), plugin).is_some() {
            tracing::warn!(authority = %name, "replacing registered authority plugin");
        }
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ChoiceAuthority>> {
        self.plugins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::ValuePairsAuthority;

    #[test]
    fn register_and_lookup() {
        let mut registry = PluginRegistry::new();
        assert!(registry.is_empty());

        registry.register(
            "common_types",
            Arc::new(ValuePairsAuthority::new("common_types", Vec::new())),
        );
        assert!(registry.contains("common_types"));
        assert!(registry.get("common_types").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["common_types".to_string()]);
    }
}
