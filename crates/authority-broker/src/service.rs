//! The choice-authority resolution service.
//!
//! Holds the immutable registry snapshot behind an atomic swap: the first
//! query builds it (once, even under concurrent first use), `clear_cache`
//! reloads the submission forms and then drops it, and the next query
//! rebuilds from scratch. Readers racing a clear see either the old
//! snapshot or a fresh build: a transient "not configured" result, never
//! a crash.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use authority_config::{Config, SubmissionConfigService};
use authority_model::{Choices, Confidence, DsoType, FieldKey};
use authority_plugins::PluginRegistry;

use crate::assign::{AppliedAuthority, assign_authority};
use crate::error::{AuthorityError, Result};
use crate::registry::{Binding, RegistrySnapshot, RegistrySummary};

const PRESENTATION_PREFIX: &str = "choices.presentation.";
const CLOSED_PREFIX: &str = "choices.closed.";

/// Resolves (field, object type, collection) to an authority backend and
/// exposes the uniform query API over it.
pub struct ChoiceAuthorityService {
    config: Config,
    forms: Arc<dyn SubmissionConfigService>,
    plugins: PluginRegistry,
    snapshot: ArcSwapOption<RegistrySnapshot>,
    build_lock: Mutex<()>,
}

impl ChoiceAuthorityService {
    pub fn new(
        config: Config,
        forms: Arc<dyn SubmissionConfigService>,
        plugins: PluginRegistry,
    ) -> Self {
        Self {
            config,
            forms,
            plugins,
            snapshot: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        }
    }

    /// Build the snapshot eagerly, surfacing configuration errors early.
    pub fn initialize(&self) -> Result<()> {
        self.snapshot().map(|_| ())
    }

    /// Drop the registry and force a submission-forms reload. The next
    /// query rebuilds everything from scratch; there is no partial
    /// invalidation.
    ///
    /// The clear holds the build lock and reloads the forms before the
    /// snapshot is dropped, so a reader racing the clear either sees the
    /// old snapshot or rebuilds from the already-reloaded document. A
    /// rebuild from the stale document can never be stored after the
    /// clear returns.
    pub fn clear_cache(&self) -> Result<()> {
        let _guard = self.build_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.forms.reload()?;
        self.snapshot.store(None);
        tracing::debug!("authority registry cache cleared");
        Ok(())
    }

    fn snapshot(&self) -> Result<Arc<RegistrySnapshot>> {
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }
        let _guard = self.build_lock.lock().unwrap_or_else(|e| e.into_inner());
        // Double-checked: another thread may have finished the build
        // while this one waited for the lock.
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }
        let built = Arc::new(RegistrySnapshot::build(
            &self.config,
            self.forms.as_ref(),
            &self.plugins,
        )?);
        self.snapshot.store(Some(built.clone()));
        Ok(built)
    }

    fn form_for_collection(&self, collection: Option<&str>) -> Option<String> {
        collection.and_then(|c| self.forms.form_name_for_collection(c))
    }

    fn resolve(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
    ) -> Result<Option<Binding>> {
        let snapshot = self.snapshot()?;
        let form = self.form_for_collection(collection);
        Ok(snapshot.resolve(field, dso_type, form.as_deref()).cloned())
    }

    fn require(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
    ) -> Result<Binding> {
        self.resolve(field, dso_type, collection)?
            .ok_or_else(|| AuthorityError::NotConfigured {
                field: field.as_str().to_string(),
            })
    }

    /// All authority entries compatible with `query`, paged.
    #[allow(clippy::too_many_arguments)]
    pub fn matches(
        &self,
        field: &FieldKey,
        query: &str,
        dso_type: DsoType,
        collection: Option<&str>,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Result<Choices> {
        let binding = self.require(field, dso_type, collection)?;
        Ok(binding.plugin.matches(field, query, start, limit, locale))
    }

    /// The single best candidate for `query`, if one can be picked.
    pub fn best_match(
        &self,
        field: &FieldKey,
        query: &str,
        dso_type: DsoType,
        collection: Option<&str>,
        locale: Option<&str>,
    ) -> Result<Choices> {
        let binding = self.require(field, dso_type, collection)?;
        Ok(binding.plugin.best_match(field, query, locale))
    }

    /// The canonical display label for a stored authority key.
    pub fn label(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
        authority_key: &str,
        locale: Option<&str>,
    ) -> Result<String> {
        let binding = self.require(field, dso_type, collection)?;
        Ok(binding.plugin.label(field, authority_key, locale))
    }

    /// Variant spellings for a stored key; empty when the backend has no
    /// variants capability.
    pub fn variants(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
        authority_key: &str,
    ) -> Result<Vec<String>> {
        let binding = self.require(field, dso_type, collection)?;
        Ok(binding
            .plugin
            .variants(field, authority_key)
            .unwrap_or_default())
    }

    /// Top entries of a hierarchical authority.
    pub fn top_choices(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Result<Choices> {
        let binding = self.require(field, dso_type, collection)?;
        let hierarchical = binding.plugin.as_hierarchical().ok_or_else(|| {
            AuthorityError::NotHierarchical {
                field: field.as_str().to_string(),
                authority: binding.authority.clone(),
            }
        })?;
        Ok(hierarchical.top_choices(field, start, limit, locale))
    }

    /// Direct children of an entry in a hierarchical authority.
    #[allow(clippy::too_many_arguments)]
    pub fn choices_by_parent(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
        parent_key: &str,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Result<Choices> {
        let binding = self.require(field, dso_type, collection)?;
        let hierarchical = binding.plugin.as_hierarchical().ok_or_else(|| {
            AuthorityError::NotHierarchical {
                field: field.as_str().to_string(),
                authority: binding.authority.clone(),
            }
        })?;
        Ok(hierarchical.choices_by_parent(field, parent_key, start, limit, locale))
    }

    /// The entity type the resolved backend links to, if any.
    pub fn linked_entity_type(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
    ) -> Result<Option<String>> {
        let binding = self.require(field, dso_type, collection)?;
        Ok(binding.plugin.linked_entity_type().map(String::from))
    }

    /// Every field whose bound backend links to `entity`.
    pub fn authority_controlled_fields_for_entity_type(
        &self,
        entity: &str,
    ) -> Result<Vec<String>> {
        Ok(self.snapshot()?.fields_for_entity_type(entity))
    }

    /// Probe: is any authority bound for this field/collection? Unlike
    /// the query calls this never errors for "not configured".
    pub fn is_choices_configured(
        &self,
        field: &FieldKey,
        dso_type: DsoType,
        collection: Option<&str>,
    ) -> bool {
        self.resolve(field, dso_type, collection)
            .map(|b| b.is_some())
            .unwrap_or(false)
    }

    /// UI presentation hint for the field (`select`/`suggest`/`lookup`),
    /// passed through uninterpreted.
    pub fn presentation(&self, field: &FieldKey) -> Option<String> {
        self.config
            .property(&format!("{PRESENTATION_PREFIX}{}", field.to_dotted()))
            .map(String::from)
    }

    /// Whether free-text values outside the authority are forbidden for
    /// this field.
    pub fn is_closed(&self, field: &FieldKey) -> bool {
        let key = format!("{CLOSED_PREFIX}{}", field.to_dotted());
        if self.config.property(&key).is_some() {
            return self.config.boolean_property(&key, false);
        }
        self.snapshot()
            .map(|s| s.is_closed_by_form(field))
            .unwrap_or(false)
    }

    /// All bound authority names.
    pub fn authority_names(&self) -> Result<Vec<String>> {
        Ok(self.snapshot()?.authority_names())
    }

    /// The distinct fields bound to a named authority.
    pub fn fields_for_authority(&self, authority: &str) -> Result<Vec<String>> {
        Ok(self.snapshot()?.fields_for_authority(authority))
    }

    /// Policy: is the field authority-controlled?
    pub fn is_authority_controlled(&self, field: &FieldKey) -> Result<bool> {
        Ok(self.snapshot()?.policy().is_controlled(field))
    }

    /// Policy: must values in the field carry an authority key?
    pub fn is_authority_required(&self, field: &FieldKey) -> Result<bool> {
        Ok(self.snapshot()?.policy().is_required(field))
    }

    /// Policy: the trust threshold for stored keys in this field.
    pub fn min_confidence(&self, field: &FieldKey) -> Result<Confidence> {
        Ok(self.snapshot()?.policy().min_confidence(field))
    }

    /// Apply the authority assignment rule for one value write.
    pub fn assign_authority(
        &self,
        field: &FieldKey,
        supplied_authority: Option<&str>,
        supplied_confidence: Option<Confidence>,
    ) -> Result<AppliedAuthority> {
        let snapshot = self.snapshot()?;
        assign_authority(snapshot.policy(), field, supplied_authority, supplied_confidence)
    }

    /// Counts from the current (or freshly built) snapshot.
    pub fn summary(&self) -> Result<RegistrySummary> {
        Ok(self.snapshot()?.summary().clone())
    }
}
