//! Authority over a loaded controlled-vocabulary tree.

use authority_config::{VocabularyFile, VocabularyNode};
use authority_model::{Choice, Choices, Confidence, FieldKey};

use crate::authority::{ChoiceAuthority, HierarchicalAuthority, page_from_matches};

/// Backend over a vocabulary CSV: durable node ids as authority keys,
/// synonym-aware matching, parent/child navigation.
#[derive(Debug, Clone)]
pub struct VocabularyAuthority {
    vocab: VocabularyFile,
}

impl VocabularyAuthority {
    pub fn new(vocab: VocabularyFile) -> Self {
        Self { vocab }
    }

    /// The vocabulary name this backend serves.
    pub fn name(&self) -> &str {
        &self.vocab.name
    }

    fn choice_for(&self, node: &VocabularyNode) -> Choice {
        let mut choice = Choice::new(
            Some(node.id.clone()),
            node.value.clone(),
            node.label.clone(),
        );
        if let Some(parent) = node.parent.as_deref()
            && let Some(parent_node) = self.vocab.get(parent)
        {
            choice = choice.with_extra("parent", parent_node.label.clone());
        }
        choice
    }

    fn node_matches(node: &VocabularyNode, needle: &str) -> bool {
        needle.is_empty()
            || node.label.to_lowercase().contains(needle)
            || node.value.to_lowercase().contains(needle)
            || node
                .synonyms
                .iter()
                .any(|s| s.to_lowercase().contains(needle))
    }

    fn node_exact(node: &VocabularyNode, needle: &str) -> bool {
        node.label.eq_ignore_ascii_case(needle)
            || node.value.eq_ignore_ascii_case(needle)
            || node.synonyms.iter().any(|s| s.eq_ignore_ascii_case(needle))
    }

    fn all_matching(&self, query: &str) -> Vec<Choice> {
        let needle = query.trim().to_lowercase();
        self.vocab
            .nodes()
            .filter(|node| Self::node_matches(node, &needle))
            .map(|node| self.choice_for(node))
            .collect()
    }

    fn page_of_ids(&self, ids: &[String], start: usize, limit: usize) -> Choices {
        let all: Vec<Choice> = ids
            .iter()
            .filter_map(|id| self.vocab.get(id))
            .map(|node| self.choice_for(node))
            .collect();
        page_from_matches(all, start, limit)
    }
}

impl ChoiceAuthority for VocabularyAuthority {
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

        if let Some(node) = self
            .vocab
            .nodes()
            .find(|node| Self::node_exact(node, needle))
        {
            return Choices::page(
                vec![self.choice_for(node)],
                0,
                1,
                Confidence::Accepted,
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
        self.vocab
            .get(authority_key)
            .map_or_else(|| authority_key.to_string(), |node| node.label.clone())
    }

    fn is_scrollable(&self) -> bool {
        true
    }

    fn linked_entity_type(&self) -> Option<&str> {
        self.vocab.entity.as_deref()
    }

    fn variants(&self, _field: &FieldKey, authority_key: &str) -> Option<Vec<String>> {
        Some(
            self.vocab
                .get(authority_key)
                .map(|node| node.synonyms.clone())
                .unwrap_or_default(),
        )
    }

    fn as_hierarchical(&self) -> Option<&dyn HierarchicalAuthority> {
        Some(self)
    }
}

impl HierarchicalAuthority for VocabularyAuthority {
    fn top_choices(
        &self,
        _field: &FieldKey,
        start: usize,
        limit: usize,
        _locale: Option<&str>,
    ) -> Choices {
        self.page_of_ids(self.vocab.top_ids(), start, limit)
    }

    fn choices_by_parent(
        &self,
        _field: &FieldKey,
        parent_key: &str,
        start: usize,
        limit: usize,
        _locale: Option<&str>,
    ) -> Choices {
        self.page_of_ids(self.vocab.children_of(parent_key), start, limit)
    }
}
