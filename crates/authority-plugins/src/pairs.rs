//! Authority over a static configured value-pairs list.

use authority_config::ValuePair;
use authority_model::{Choice, Choices, Confidence, FieldKey};

use crate::authority::{ChoiceAuthority, page_from_matches};

/// Backend over a named value-pairs list from the submission forms.
///
/// Entries have no durable key: the stored value is the only handle, so
/// returned choices carry no authority key and nothing is persisted.
#[derive(Debug, Clone)]
pub struct ValuePairsAuthority {
    name: String,
    pairs: Vec<ValuePair>,
}

impl ValuePairsAuthority {
    pub fn new(name: impl Into<String>, pairs: Vec<ValuePair>) -> Self {
        Self {
            name: name.into(),
            pairs,
        }
    }

    /// The pairs-list name this backend was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn all_matching(&self, query: &str) -> Vec<Choice> {
        let needle = query.trim().to_lowercase();
        self.pairs
            .iter()
            .filter(|p| needle.is_empty() || p.label.to_lowercase().contains(&needle))
            .map(|p| Choice::new(None, p.value.clone(), p.label.clone()))
            .collect()
    }
}

impl ChoiceAuthority for ValuePairsAuthority {
    fn matches(
        &self,
        _field: &FieldKey,
        query: &str,
        start: usize,
        limit: usize,
        _locale: Option<&str>,
    ) -> Choices {
        page_from_matches(self.all_matching(query), start, limit)
    }

    fn best_match(&self, _field: &FieldKey, query: &str, _locale: Option<&str>) -> Choices {
        let needle = query.trim();
        if needle.is_empty() {
            return Choices::with_confidence(Confidence::NotFound);
        }

        // An exact label or value hit wins even when the substring search
        // would be ambiguous.
        if let Some(pair) = self.pairs.iter().find(|p| {
            p.value.eq_ignore_ascii_case(needle) || p.label.eq_ignore_ascii_case(needle)
        }) {
            return Choices::page(
                vec![Choice::new(None, pair.value.clone(), pair.label.clone())],
                0,
                1,
                Confidence::Uncertain,
                false,
            );
        }

        let mut all = self.all_matching(needle);
        match all.len() {
            0 => Choices::with_confidence(Confidence::NotFound),
            1 => Choices::page(vec![all.remove(0)], 0, 1, Confidence::Uncertain, false),
            _ => Choices::with_confidence(Confidence::Ambiguous),
        }
    }

    fn label(&self, _field: &FieldKey, authority_key: &str, _locale: Option<&str>) -> String {
        self.pairs
            .iter()
            .find(|p| p.value.eq_ignore_ascii_case(authority_key))
            .map_or_else(|| authority_key.to_string(), |p| p.label.clone())
    }

    fn has_identifier(&self) -> bool {
        false
    }

    fn store_authority(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ValuePairsAuthority {
        ValuePairsAuthority::new(
            "common_types",
            vec![
                ValuePair {
                    label: "Book".to_string(),
                    value: "book".to_string(),
                },
                ValuePair {
                    label: "Book chapter".to_string(),
                    value: "book_chapter".to_string(),
                },
                ValuePair {
                    label: "Article".to_string(),
                    value: "article".to_string(),
                },
            ],
        )
    }

    fn field() -> FieldKey {
        FieldKey::new("dc", "type", None)
    }

    #[test]
    fn substring_matching_is_case_insensitive() {
        let page = backend().matches(&field(), "book", 0, 10, None);
        assert_eq!(page.total, 2);
        assert_eq!(page.confidence, Confidence::Ambiguous);
        assert!(page.values.iter().all(|c| c.authority.is_none()));
    }

    #[test]
    fn empty_query_lists_everything() {
        let page = backend().matches(&field(), "", 0, 0, None);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn single_match_is_uncertain() {
        let page = backend().matches(&field(), "artic", 0, 10, None);
        assert_eq!(page.confidence, Confidence::Uncertain);
        assert_eq!(page.values[0].value, "article");
    }

    #[test]
    fn best_match_prefers_exact_hits() {
        let best = backend().best_match(&field(), "Book", None);
        assert_eq!(best.values.len(), 1);
        assert_eq!(best.values[0].value, "book");
        assert_eq!(best.confidence, Confidence::Uncertain);

        let ambiguous = backend().best_match(&field(), "boo", None);
        assert!(ambiguous.values.is_empty());
        assert_eq!(ambiguous.confidence, Confidence::Ambiguous);

        let none = backend().best_match(&field(), "zzz", None);
        assert_eq!(none.confidence, Confidence::NotFound);
    }

    #[test]
    fn label_falls_back_to_the_key() {
        let backend = backend();
        assert_eq!(backend.label(&field(), "book_chapter", None), "Book chapter");
        assert_eq!(backend.label(&field(), "unknown", None), "unknown");
    }

    #[test]
    fn capability_flags() {
        let backend = backend();
        assert!(!backend.has_identifier());
        assert!(!backend.store_authority());
        assert!(backend.as_hierarchical().is_none());
        assert!(backend.variants(&field(), "book").is_none());
    }
}
