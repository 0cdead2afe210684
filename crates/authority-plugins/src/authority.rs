//! The capability contract every authority backend implements.

use authority_model::{Choice, Choices, Confidence, FieldKey};

/// An authority source that can resolve user-entered text against its
/// entries and translate stored authority keys back to labels.
///
/// The mechanism is unconstrained (lookup table, SQL, search index,
/// outbound vocabulary service); only the confidence semantics and
/// null-safety are: every method returns a usable result, and an internal
/// backend failure degrades to a `Failed` page rather than an error.
pub trait ChoiceAuthority: Send + Sync {
    /// All entries compatible with `query` (backend-defined, typically
    /// prefix/substring on the label), windowed by `start`/`limit`
    /// (`limit == 0` means unbounded).
    ///
    /// Confidence for the page: `Ambiguous` for two or more total
    /// matches, `Uncertain` for exactly one, `NotFound` for zero,
    /// `Failed` on internal error.
    fn matches(
        &self,
        field: &FieldKey,
        query: &str,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Choices;

    /// Zero or one entries: the single best candidate, with confidence
    /// reflecting how certain that one choice is. `Accepted` for an exact
    /// canonical hit, `Uncertain` for a unique partial match, an empty
    /// `Ambiguous` page when no single candidate can be picked,
    /// `NotFound` when nothing matches.
    fn best_match(&self, field: &FieldKey, query: &str, locale: Option<&str>) -> Choices;

    /// Reverse lookup from a stored authority key to its canonical
    /// display label. Always returns a non-empty string; falls back to
    /// the key itself when unresolved.
    fn label(&self, field: &FieldKey, authority_key: &str, locale: Option<&str>) -> String;

    /// Whether this source supports stable paging beyond a single page.
    fn is_scrollable(&self) -> bool {
        false
    }

    /// Whether entries carry a durable authority key, as opposed to
    /// being keyed only by their value.
    fn has_identifier(&self) -> bool {
        true
    }

    /// Whether the authority key resolved by this source should be
    /// persisted alongside the metadata value.
    fn store_authority(&self) -> bool {
        true
    }

    /// The entity type this source links to, if any.
    fn linked_entity_type(&self) -> Option<&str> {
        None
    }

    /// Known variant spellings for a stored key. `None` when the source
    /// has no variants capability at all.
    fn variants(&self, field: &FieldKey, authority_key: &str) -> Option<Vec<String>> {
        let _ = (field, authority_key);
        None
    }

    /// Hierarchy capability probe: `Some` when the source supports
    /// parent/child navigation.
    fn as_hierarchical(&self) -> Option<&dyn HierarchicalAuthority> {
        None
    }
}

/// Parent/child navigation over a tree-shaped authority source.
pub trait HierarchicalAuthority: ChoiceAuthority {
    /// The parentless top entries.
    fn top_choices(
        &self,
        field: &FieldKey,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Choices;

    /// The direct children of the entry keyed by `parent_key`.
    fn choices_by_parent(
        &self,
        field: &FieldKey,
        parent_key: &str,
        start: usize,
        limit: usize,
        locale: Option<&str>,
    ) -> Choices;
}

/// Window a full candidate list into one page with the standard
/// count-based confidence: zero total is `NotFound`, one is `Uncertain`,
/// two or more is `Ambiguous`.
pub fn page_from_matches(all: Vec<Choice>, start: usize, limit: usize) -> Choices {
    let total = all.len();
    let confidence = match total {
        0 => Confidence::NotFound,
        1 => Confidence::Uncertain,
        _ => Confidence::Ambiguous,
    };

    let window: Vec<Choice> = if start >= total {
        Vec::new()
    } else if limit == 0 {
        all.into_iter().skip(start).collect()
    } else {
        all.into_iter().skip(start).take(limit).collect()
    };

    let more = start + window.len() < total;
    Choices::page(window, start, total, confidence, more)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<Choice> {
        (0..n)
            .map(|i| Choice::new(Some(format!("k{i}")), format!("v{i}"), format!("l{i}")))
            .collect()
    }

    #[test]
    fn confidence_follows_total_count() {
        assert_eq!(
            page_from_matches(candidates(0), 0, 10).confidence,
            Confidence::NotFound
        );
        assert_eq!(
            page_from_matches(candidates(1), 0, 10).confidence,
            Confidence::Uncertain
        );
        assert_eq!(
            page_from_matches(candidates(2), 0, 10).confidence,
            Confidence::Ambiguous
        );
    }

    #[test]
    fn windowing_and_more_flag() {
        let page = page_from_matches(candidates(5), 1, 2);
        assert_eq!(page.start, 1);
        assert_eq!(page.total, 5);
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[0].value, "v1");
        assert!(page.more);

        let tail = page_from_matches(candidates(5), 3, 2);
        assert!(!tail.more);

        let unbounded = page_from_matches(candidates(5), 0, 0);
        assert_eq!(unbounded.values.len(), 5);
        assert!(!unbounded.more);
    }

    #[test]
    fn window_past_the_end_keeps_total() {
        let page = page_from_matches(candidates(3), 10, 5);
        assert!(page.values.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.confidence, Confidence::Ambiguous);
        assert!(!page.more);
    }
}
