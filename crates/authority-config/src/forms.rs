//! Submission-form definitions.
//!
//! Forms are authored as TOML: each form names the metadata fields it
//! collects, and a field may reference a value-pairs list (`pairs`) or a
//! controlled vocabulary (`vocabulary`). Those references are what the
//! broker auto-registers as authorities. `upload-fields` are scanned as a
//! second pass and bind under the bitstream object type.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// One `label`/`value` entry of a value-pairs list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValuePair {
    pub label: String,
    pub value: String,
}

/// One metadata field of a submission form.
#[derive(Debug, Clone, Deserialize)]
pub struct FormField {
    pub schema: String,
    pub element: String,
    #[serde(default)]
    pub qualifier: Option<String>,

    /// Controlled vocabulary backing this field, if any.
    #[serde(default)]
    pub vocabulary: Option<String>,

    /// Value-pairs list backing this field, if any.
    #[serde(default)]
    pub pairs: Option<String>,

    /// Whether the authority key resolved for this field should be
    /// persisted alongside the value.
    #[serde(default, rename = "store-authority")]
    pub store_authority: bool,

    /// Whether free-text values outside the authority are forbidden.
    #[serde(default)]
    pub closed: bool,
}

impl FormField {
    /// The pairs or vocabulary name this field references, if any.
    pub fn authority_name(&self) -> Option<&str> {
        self.vocabulary.as_deref().or(self.pairs.as_deref())
    }
}

/// One submission form definition.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    /// Bitstream metadata fields collected during the upload step.
    #[serde(default, rename = "upload-fields")]
    pub upload_fields: Vec<FormField>,
}

#[derive(Debug, Clone, Deserialize)]
struct PairsList {
    entries: Vec<ValuePair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FormsDoc {
    #[serde(default)]
    collections: BTreeMap<String, String>,
    #[serde(default)]
    forms: Vec<FormDefinition>,
    #[serde(default)]
    pairs: BTreeMap<String, PairsList>,
}

/// Maps collections to the submission form that owns them and hands out
/// the form/field definitions the broker scans.
///
/// This is a fallible synchronous collaborator: `reload` re-reads the
/// definitions and propagates malformed input as a hard error.
pub trait SubmissionConfigService: Send + Sync {
    /// The submission form owning `collection`, if the collection is known.
    fn form_name_for_collection(&self, collection: &str) -> Option<String>;

    /// All form definitions, in declaration order.
    fn forms(&self) -> Vec<FormDefinition>;

    /// A named value-pairs list, if declared.
    fn value_pairs(&self, name: &str) -> Option<Vec<ValuePair>>;

    /// Re-read the definitions from their source.
    fn reload(&self) -> Result<()>;
}

/// `SubmissionConfigService` backed by a TOML file on disk.
#[derive(Debug)]
pub struct TomlFormReader {
    path: PathBuf,
    doc: RwLock<FormsDoc>,
}

impl TomlFormReader {
    /// Load and validate the definitions file.
    pub fn load(path: &Path) -> Result<Self> {
        let doc = read_forms_doc(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            doc: RwLock::new(doc),
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FormsDoc> {
        // Lock poisoning only happens if a panic escaped mid-write; the
        // document itself is replaced wholesale, so the data is intact.
        self.doc.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl SubmissionConfigService for TomlFormReader {
    fn form_name_for_collection(&self, collection: &str) -> Option<String> {
        self.read().collections.get(collection).cloned()
    }

    fn forms(&self) -> Vec<FormDefinition> {
        self.read().forms.clone()
    }

    fn value_pairs(&self, name: &str) -> Option<Vec<ValuePair>> {
        self.read().pairs.get(name).map(|p| p.entries.clone())
    }

    fn reload(&self) -> Result<()> {
        let doc = read_forms_doc(&self.path)?;
        tracing::debug!(path = %self.path.display(), forms = doc.forms.len(), "reloaded submission forms");
        *self.doc.write().unwrap_or_else(|e| e.into_inner()) = doc;
        Ok(())
    }
}

/// In-memory `SubmissionConfigService` for embedders and tests.
#[derive(Debug, Default)]
pub struct StaticForms {
    collections: BTreeMap<String, String>,
    forms: Vec<FormDefinition>,
    pairs: BTreeMap<String, Vec<ValuePair>>,
}

impl StaticForms {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>, form: impl Into<String>) -> Self {
        self.collections.insert(collection.into(), form.into());
        self
    }

    #[must_use]
    pub fn with_form(mut self, form: FormDefinition) -> Self {
        self.forms.push(form);
        self
    }

    #[must_use]
    pub fn with_pairs(mut self, name: impl Into<String>, entries: Vec<ValuePair>) -> Self {
        self.pairs.insert(name.into(), entries);
        self
    }
}

impl SubmissionConfigService for StaticForms {
    fn form_name_for_collection(&self, collection: &str) -> Option<String> {
        self.collections.get(collection).cloned()
    }

    fn forms(&self) -> Vec<FormDefinition> {
        self.forms.clone()
    }

    fn value_pairs(&self, name: &str) -> Option<Vec<ValuePair>> {
        self.pairs.get(name).cloned()
    }

    fn reload(&self) -> Result<()> {
        Ok(())
    }
}

fn read_forms_doc(path: &Path) -> Result<FormsDoc> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let doc: FormsDoc = toml::from_str(&contents).map_err(|e| ConfigError::toml(path, e))?;
    validate_forms_doc(&doc)?;
    Ok(doc)
}

fn validate_forms_doc(doc: &FormsDoc) -> Result<()> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for form in &doc.forms {
        if form.name.trim().is_empty() {
            return Err(ConfigError::InvalidForms {
                message: "form with empty name".to_string(),
            });
        }
        if !names.insert(form.name.as_str()) {
            return Err(ConfigError::InvalidForms {
                message: format!("duplicate form name: {}", form.name),
            });
        }
        for field in form.fields.iter().chain(form.upload_fields.iter()) {
            validate_field(&form.name, field)?;
        }
    }

    for (form_name, target) in &doc.collections {
        if !names.contains(target.as_str()) {
            return Err(ConfigError::InvalidForms {
                message: format!("collection '{form_name}' maps to unknown form '{target}'"),
            });
        }
    }

    Ok(())
}

fn validate_field(form: &str, field: &FormField) -> Result<()> {
    if field.schema.trim().is_empty() || field.element.trim().is_empty() {
        return Err(ConfigError::InvalidForms {
            message: format!("form '{form}' has a field with empty schema/element"),
        });
    }
    if field.vocabulary.is_some() && field.pairs.is_some() {
        return Err(ConfigError::InvalidForms {
            message: format!(
                "form '{form}' field {}.{} declares both vocabulary and pairs",
                field.schema, field.element
            ),
        });
    }
    if let Some(name) = field.authority_name()
        && name.trim().is_empty()
    {
        return Err(ConfigError::InvalidForms {
            message: format!(
                "form '{form}' field {}.{} references an empty authority name",
                field.schema, field.element
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<FormsDoc> {
        let doc: FormsDoc = toml::from_str(text).map_err(|e| ConfigError::toml("inline", e))?;
        validate_forms_doc(&doc)?;
        Ok(doc)
    }

    #[test]
    fn parses_a_full_document() {
        let doc = parse(
            r#"
            [collections]
            "123456789/3" = "traditional"

            [[forms]]
            name = "traditional"

            [[forms.fields]]
            schema = "dc"
            element = "contributor"
            qualifier = "author"
            vocabulary = "srsc"
            store-authority = true

            [[forms.upload-fields]]
            schema = "dc"
            element = "type"
            pairs = "common_types"

            [pairs.common_types]
            entries = [
                { label = "Book", value = "book" },
                { label = "Article", value = "article" },
            ]
            "#,
        )
        .expect("valid document");

        assert_eq!(doc.forms.len(), 1);
        let form = &doc.forms[0];
        assert_eq!(form.name, "traditional");
        assert_eq!(form.fields[0].authority_name(), Some("srsc"));
        assert!(form.fields[0].store_authority);
        assert_eq!(form.upload_fields[0].authority_name(), Some("common_types"));
        assert_eq!(doc.pairs["common_types"].entries.len(), 2);
        assert_eq!(
            doc.collections.get("123456789/3").map(String::as_str),
            Some("traditional")
        );
    }

    #[test]
    fn duplicate_form_names_rejected() {
        let err = parse(
            r#"
            [[forms]]
            name = "traditional"
            [[forms]]
            name = "traditional"
            "#,
        )
        .expect_err("duplicate should fail");
        assert!(matches!(err, ConfigError::InvalidForms { .. }));
    }

    #[test]
    fn vocabulary_and_pairs_are_exclusive() {
        let err = parse(
            r#"
            [[forms]]
            name = "traditional"
            [[forms.fields]]
            schema = "dc"
            element = "subject"
            vocabulary = "lcsh"
            pairs = "subjects"
            "#,
        )
        .expect_err("exclusive reference should fail");
        assert!(matches!(err, ConfigError::InvalidForms { .. }));
    }

    #[test]
    fn collection_must_map_to_known_form() {
        let err = parse(
            r#"
            [collections]
            "123456789/9" = "missing"
            "#,
        )
        .expect_err("unknown form should fail");
        assert!(matches!(err, ConfigError::InvalidForms { .. }));
    }
}
