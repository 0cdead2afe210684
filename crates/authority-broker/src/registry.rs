//! The registry snapshot: every field-to-authority binding under one
//! composite key, with an ordered probe list for resolution.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use authority_config::{Config, SubmissionConfigService, VocabularyFile};
use authority_model::{DsoType, FieldKey};
use authority_plugins::{
    ChoiceAuthority, PluginRegistry, ValuePairsAuthority, VocabularyAuthority,
};

use crate::error::{AuthorityError, Result};
use crate::policy::AuthorityPolicySet;

const PLUGIN_PREFIX: &str = "choices.plugin.";
const VOCABULARIES_DIR_KEY: &str = "vocabularies.dir";

/// Composite binding key: field plus the optional object-type and
/// submission-form scope. One flat map replaces the nested
/// field/type/form containers; resolution walks key variants from most
/// specific to least specific.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BindingKey {
    pub field: String,
    pub dso_type: Option<DsoType>,
    pub form: Option<String>,
}

impl BindingKey {
    /// The one universal binding for a field.
    pub fn global(field: &FieldKey) -> Self {
        Self {
            field: field.as_str().to_string(),
            dso_type: None,
            form: None,
        }
    }

    /// An explicit form-scoped override (wins over the global binding).
    pub fn form_override(field: &FieldKey, form: &str) -> Self {
        Self {
            field: field.as_str().to_string(),
            dso_type: None,
            form: Some(form.to_string()),
        }
    }

    /// A binding discovered by the submission-form scan.
    pub fn form_scan(field: &FieldKey, dso_type: DsoType, form: &str) -> Self {
        Self {
            field: field.as_str().to_string(),
            dso_type: Some(dso_type),
            form: Some(form.to_string()),
        }
    }
}

/// A resolved authority: the configured name and the backend behind it.
#[derive(Clone)]
pub struct Binding {
    pub authority: String,
    pub plugin: Arc<dyn ChoiceAuthority>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("authority", &self.authority)
            .finish()
    }
}

/// Counts reported after a snapshot build, for diagnostics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistrySummary {
    pub bindings: usize,
    pub authorities: usize,
    pub forms: usize,
    pub controlled_fields: usize,
    pub pairs_backends: usize,
    pub vocabulary_backends: usize,
}

/// One immutable build of the full registry. Rebuilt from scratch on
/// every cache clear; never partially mutated.
pub struct RegistrySnapshot {
    bindings: BTreeMap<BindingKey, Binding>,
    fields_by_authority: BTreeMap<String, Vec<BindingKey>>,
    closed_fields: Vec<String>,
    policy: AuthorityPolicySet,
    summary: RegistrySummary,
}

impl RegistrySnapshot {
    /// Build the snapshot from the configuration keys, the submission
    /// forms, and the registered plugins.
    ///
    /// A `choices.plugin.*` key naming an unknown plugin is skipped with
    /// a warning; a forms-referenced authority with no backend at all is
    /// a hard error.
    pub fn build(
        config: &Config,
        forms: &dyn SubmissionConfigService,
        plugins: &PluginRegistry,
    ) -> Result<Self> {
        let form_defs = forms.forms();
        let mut builder = SnapshotBuilder {
            forms,
            plugins,
            vocab_dir: config.property(VOCABULARIES_DIR_KEY).map(PathBuf::from),
            auto_built: BTreeMap::new(),
            pairs_backends: 0,
            vocabulary_backends: 0,
        };

        let mut bindings: BTreeMap<BindingKey, Binding> = BTreeMap::new();
        let mut auto_controlled: Vec<FieldKey> = Vec::new();
        let mut closed_fields: Vec<String> = Vec::new();

        // Pass 1: explicit choices.plugin.* bindings. A declared form
        // name followed by '_' scopes the binding to that submission
        // form. The longest matching name wins, so a form named with an
        // underscore is not shadowed by a shorter form name.
        let form_names: Vec<&str> = form_defs.iter().map(|f| f.name.as_str()).collect();
        for config_key in config.property_keys(PLUGIN_PREFIX) {
            let rest = &config_key[PLUGIN_PREFIX.len()..];
            let (form, field_part) = match form_names
                .iter()
                .filter(|name| rest.len() > name.len() + 1 && rest.starts_with(&format!("{name}_")))
                .max_by_key(|name| name.len())
            {
                Some(name) => (Some(*name), &rest[name.len() + 1..]),
                None => (None, rest),
            };
            let field = FieldKey::from_dotted(field_part);

            let Some(name) = config.property(&config_key) else {
                continue;
            };
            let Some(plugin) = builder.backend_for(name)? else {
                tracing::warn!(
                    authority = name,
                    field = %field,
                    "skipping binding: no backend for configured authority"
                );
                continue;
            };

            let key = match form {
                Some(form) => BindingKey::form_override(&field, form),
                None => BindingKey::global(&field),
            };
            tracing::debug!(field = %field, authority = name, form = ?form, "bound authority");
            bindings.insert(
                key,
                Binding {
                    authority: name.to_string(),
                    plugin,
                },
            );
        }

        // Pass 2: scan every submission form. Item metadata fields first,
        // then bitstream metadata from the upload step.
        for form in &form_defs {
            let scans = [
                (DsoType::Item, &form.fields),
                (DsoType::Bitstream, &form.upload_fields),
            ];
            for (dso_type, fields) in scans {
                for field_def in fields {
                    let Some(name) = field_def.authority_name() else {
                        continue;
                    };
                    let plugin = builder.backend_for(name)?.ok_or_else(|| {
                        AuthorityError::UnknownAuthority {
                            name: name.to_string(),
                            form: form.name.clone(),
                        }
                    })?;

                    let field = FieldKey::new(
                        &field_def.schema,
                        &field_def.element,
                        field_def.qualifier.as_deref(),
                    );
                    if field_def.store_authority && plugin.store_authority() {
                        auto_controlled.push(field.clone());
                    }
                    if field_def.closed {
                        closed_fields.push(field.as_str().to_string());
                    }

                    let key = BindingKey::form_scan(&field, dso_type, &form.name);
                    tracing::debug!(
                        field = %field,
                        authority = name,
                        form = %form.name,
                        dso = %dso_type,
                        "bound form authority"
                    );
                    bindings.insert(
                        key,
                        Binding {
                            authority: name.to_string(),
                            plugin,
                        },
                    );
                }
            }
        }

        let mut fields_by_authority: BTreeMap<String, Vec<BindingKey>> = BTreeMap::new();
        for (key, binding) in &bindings {
            fields_by_authority
                .entry(binding.authority.clone())
                .or_default()
                .push(key.clone());
        }

        let policy = AuthorityPolicySet::build(config, &auto_controlled);
        let summary = RegistrySummary {
            bindings: bindings.len(),
            authorities: fields_by_authority.len(),
            forms: form_defs.len(),
            controlled_fields: policy.controlled_fields().len(),
            pairs_backends: builder.pairs_backends,
            vocabulary_backends: builder.vocabulary_backends,
        };
        tracing::info!(
            bindings = summary.bindings,
            authorities = summary.authorities,
            forms = summary.forms,
            "built authority registry"
        );

        Ok(Self {
            bindings,
            fields_by_authority,
            closed_fields,
            policy,
            summary,
        })
    }

    /// Resolve a field to its binding, probing key variants in order:
    /// the explicit form-scoped override, then the universal binding,
    /// then the submission-form scan binding for the object type.
    pub fn resolve(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        form: Option<&str>,
    ) -> Option<&Binding> {
        let mut probes: Vec<BindingKey> = Vec::with_capacity(3);
        if let Some(form) = form {
            probes.push(BindingKey::form_override(field, form));
        }
        probes.push(BindingKey::global(field));
        if let Some(form) = form {
            probes.push(BindingKey::form_scan(field, dso_type, form));
        }
        probes.iter().find_map(|key| self.bindings.get(key))
    }

    /// All bound authority names, sorted.
    pub fn authority_names(&self) -> Vec<String> {
        self.fields_by_authority.keys().cloned().collect()
    }

    /// The distinct field keys bound to `authority`, stripped of any
    /// form/type scope.
    pub fn fields_for_authority(&self, authority: &str) -> Vec<String> {
        let mut fields: Vec<String> = self
            .fields_by_authority
            .get(authority)
            .map(|keys| keys.iter().map(|k| k.field.clone()).collect())
            .unwrap_or_default();
        fields.sort();
        fields.dedup();
        fields
    }

    /// The distinct field keys whose bound backend links to `entity`.
    pub fn fields_for_entity_type(&self, entity: &str) -> Vec<String> {
        let mut fields: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, binding)| binding.plugin.linked_entity_type() == Some(entity))
            .map(|(key, _)| key.field.clone())
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    /// Whether a form field declared the value closed to free text.
    pub fn is_closed_by_form(&self, field: &FieldKey) -> bool {
        self.closed_fields.iter().any(|f| f == field.as_str())
    }

    pub fn policy(&self) -> &AuthorityPolicySet {
        &self.policy
    }

    pub fn summary(&self) -> &RegistrySummary {
        &self.summary
    }
}

/// Build-scoped state: backends already constructed for referenced
/// names, so two forms sharing a vocabulary share one instance.
struct SnapshotBuilder<'a> {
    forms: &'a dyn SubmissionConfigService,
    plugins: &'a PluginRegistry,
    vocab_dir: Option<PathBuf>,
    auto_built: BTreeMap<String, Arc<dyn ChoiceAuthority>>,
    pairs_backends: usize,
    vocabulary_backends: usize,
}

impl SnapshotBuilder<'_> {
    fn backend_for(&mut self, name: &str) -> Result<Option<Arc<dyn ChoiceAuthority>>> {
        if let Some(plugin) = self.plugins.get(name) {
            return Ok(Some(plugin));
        }
        if let Some(plugin) = self.auto_built.get(name) {
            return Ok(Some(plugin.clone()));
        }

        if let Some(entries) = self.forms.value_pairs(name) {
            let plugin: Arc<dyn ChoiceAuthority> =
                Arc::new(ValuePairsAuthority::new(name, entries));
            self.auto_built.insert(name.to_string(), plugin.clone());
            self.pairs_backends += 1;
            return Ok(Some(plugin));
        }

        if let Some(dir) = &self.vocab_dir {
            let path = dir.join(format!("{name}.csv"));
            if path.is_file() {
                let vocab = VocabularyFile::load(&path)?;
                let plugin: Arc<dyn ChoiceAuthority> = Arc::new(VocabularyAuthority::new(vocab));
                self.auto_built.insert(name.to_string(), plugin.clone());
                self.vocabulary_backends += 1;
                return Ok(Some(plugin));
            }
        }

        Ok(None)
    }
}
