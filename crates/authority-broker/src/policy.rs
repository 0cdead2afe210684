//! Per-field authority policy: controlled / required / minimum confidence.

use std::collections::{BTreeMap, BTreeSet};

use authority_config::Config;
use authority_model::{Confidence, FieldKey};

const CONTROLLED_PREFIX: &str = "authority.controlled.";
const REQUIRED_PREFIX: &str = "authority.required.";
const MINCONFIDENCE_KEY: &str = "authority.minconfidence";

/// The policy map for every authority-controlled field.
///
/// Built from the `authority.*` configuration keys plus auto-registration
/// of form fields whose backend persists its authority key. The minimum
/// confidence is a threshold surfaced to callers (below it a stored key
/// is present but not fully trusted); it is not enforced here.
#[derive(Debug, Clone)]
pub struct AuthorityPolicySet {
    controlled: BTreeSet<String>,
    required: BTreeSet<String>,
    min_confidence: BTreeMap<String, Confidence>,
    default_min: Confidence,
}

impl AuthorityPolicySet {
    /// Build the policy map. `auto_controlled` are the field keys the
    /// submission-form scan marked as persisting authority values.
    pub(crate) fn build(config: &Config, auto_controlled: &[FieldKey]) -> Self {
        let mut controlled: BTreeSet<String> = auto_controlled
            .iter()
            .map(|f| f.as_str().to_string())
            .collect();
        let mut required = BTreeSet::new();
        let mut min_confidence = BTreeMap::new();

        for key in config.property_keys(CONTROLLED_PREFIX) {
            let field = FieldKey::from_dotted(&key[CONTROLLED_PREFIX.len()..]);
            if config.boolean_property(&key, false) {
                controlled.insert(field.as_str().to_string());
            }
        }

        for key in config.property_keys(REQUIRED_PREFIX) {
            let field = FieldKey::from_dotted(&key[REQUIRED_PREFIX.len()..]);
            if config.boolean_property(&key, false) {
                required.insert(field.as_str().to_string());
            }
        }

        let default_min = config
            .property(MINCONFIDENCE_KEY)
            .map_or(Confidence::Accepted, |raw| {
                Confidence::from_symbol_or(raw, Confidence::Accepted)
            });

        let per_field_prefix = format!("{MINCONFIDENCE_KEY}.");
        for key in config.property_keys(&per_field_prefix) {
            let field = FieldKey::from_dotted(&key[per_field_prefix.len()..]);
            if let Some(raw) = config.property(&key) {
                min_confidence.insert(
                    field.as_str().to_string(),
                    Confidence::from_symbol_or(raw, default_min),
                );
            }
        }

        Self {
            controlled,
            required,
            min_confidence,
            default_min,
        }
    }

    /// Is this field authority-controlled at all?
    pub fn is_controlled(&self, field: &FieldKey) -> bool {
        self.controlled.contains(field.as_str())
    }

    /// Must values in this field carry an authority key?
    pub fn is_required(&self, field: &FieldKey) -> bool {
        self.required.contains(field.as_str())
    }

    /// The confidence threshold below which a stored key should not be
    /// treated as fully trusted.
    pub fn min_confidence(&self, field: &FieldKey) -> Confidence {
        self.min_confidence
            .get(field.as_str())
            .copied()
            .unwrap_or(self.default_min)
    }

    /// All controlled field keys, sorted.
    pub fn controlled_fields(&self) -> Vec<String> {
        self.controlled.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AuthorityPolicySet {
        let config = Config::from_pairs([
            ("authority.controlled.dc.subject", "true"),
            ("authority.required.dc.subject", "true"),
            ("authority.controlled.dc.type", "false"),
            ("authority.minconfidence", "UNCERTAIN"),
            ("authority.minconfidence.dc.subject", "ACCEPTED"),
        ]);
        AuthorityPolicySet::build(
            &config,
            &[FieldKey::new("dc", "contributor", Some("author"))],
        )
    }

    #[test]
    fn controlled_and_required() {
        let policy = policy();
        assert!(policy.is_controlled(&FieldKey::from_dotted("dc.subject")));
        assert!(policy.is_required(&FieldKey::from_dotted("dc.subject")));
        assert!(!policy.is_controlled(&FieldKey::from_dotted("dc.type")));
        assert!(!policy.is_required(&FieldKey::from_dotted("dc.title")));
    }

    #[test]
    fn form_scan_auto_registers() {
        let policy = policy();
        let author = FieldKey::new("dc", "contributor", Some("author"));
        assert!(policy.is_controlled(&author));
        assert!(!policy.is_required(&author));
    }

    #[test]
    fn min_confidence_fallback_chain() {
        let policy = policy();
        assert_eq!(
            policy.min_confidence(&FieldKey::from_dotted("dc.subject")),
            Confidence::Accepted
        );
        assert_eq!(
            policy.min_confidence(&FieldKey::from_dotted("dc.title")),
            Confidence::Uncertain
        );

        let bare = AuthorityPolicySet::build(&Config::default(), &[]);
        assert_eq!(
            bare.min_confidence(&FieldKey::from_dotted("dc.title")),
            Confidence::Accepted
        );
    }
}
