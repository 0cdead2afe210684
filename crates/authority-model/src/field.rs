//! Normalized metadata field keys.

use serde::{Deserialize, Serialize};

/// Normalized identifier for a metadata field, derived from
/// (schema, element, qualifier) by joining the present parts with `_`
/// (e.g. `dc_contributor_author`).
///
/// Qualifier absence (`dc_subject`) and the qualifier wildcard
/// (`dc_subject_*`, the literal `*`) are distinct normalized forms.
/// Field keys are the primary lookup key into every policy and broker map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Build a key from its parts. Pass `Some("*")` for the wildcard form.
    pub fn new(schema: &str, element: &str, qualifier: Option<&str>) -> Self {
        match qualifier {
            Some(q) if !q.trim().is_empty() => {
                Self(format!("{}_{}_{}", schema.trim(), element.trim(), q.trim()))
            }
            _ => Self(format!("{}_{}", schema.trim(), element.trim())),
        }
    }

    /// Build a key from dotted notation (`dc.contributor.author`).
    /// Extra segments beyond the qualifier are folded into it unchanged.
    pub fn from_dotted(dotted: &str) -> Self {
        Self(dotted.trim().replace('.', "_"))
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dotted rendition (`dc.contributor.author`), for display and
    /// configuration keys.
    pub fn to_dotted(&self) -> String {
        self.0.replace('_', ".")
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of object owning a metadata value. Bitstream metadata fields
/// come from the upload-step scan pass over the submission forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DsoType {
    Item,
    Bitstream,
}

impl std::fmt::Display for DsoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Bitstream => write!(f, "bitstream"),
        }
    }
}
