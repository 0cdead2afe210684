//! Candidate matches returned by authority lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

/// One candidate match from an authority source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Opaque durable key identifying the real-world entity, or `None`
    /// when the source has no notion of one (value-keyed sources).
    pub authority: Option<String>,

    /// The value to store in the metadata field.
    pub value: String,

    /// Human-readable display string. Never empty for a choice built from
    /// a successful lookup; may equal `value`.
    pub label: String,

    /// Additional display/data attributes (e.g. an identifier, an
    /// institution name). Keys are unique; order is irrelevant.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl Choice {
    /// Create a choice with no extra attributes.
    pub fn new(
        authority: Option<String>,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            authority,
            value: value.into(),
            label: label.into(),
            extras: BTreeMap::new(),
        }
    }

    /// Attach an extra display attribute.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// One page of an authority query result.
///
/// The confidence applies to the page as a whole. Error and empty pages
/// are normalized at construction so the confidence never carries an
/// invalid level for the shape of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choices {
    /// Ordered candidate matches for this page.
    pub values: Vec<Choice>,

    /// Confidence for the whole page.
    pub confidence: Confidence,

    /// Offset of this page within the full result.
    pub start: usize,

    /// Total number of matches across all pages. Always >= `values.len()`.
    pub total: usize,

    /// True iff results exist beyond this page.
    pub more: bool,

    /// Index into `values` to pre-select, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_selected: Option<usize>,
}

impl Choices {
    /// A successful result page.
    ///
    /// `total` is clamped up to `values.len()` so the page invariant holds
    /// even for a careless backend.
    pub fn page(
        values: Vec<Choice>,
        start: usize,
        total: usize,
        confidence: Confidence,
        more: bool,
    ) -> Self {
        let total = total.max(values.len());
        Self {
            values,
            confidence,
            start,
            total,
            more,
            default_selected: None,
        }
    }

    /// A successful result page with a pre-selected entry.
    ///
    /// An out-of-range index is dropped rather than stored.
    pub fn page_with_selected(
        values: Vec<Choice>,
        start: usize,
        total: usize,
        confidence: Confidence,
        more: bool,
        default_selected: usize,
    ) -> Self {
        let mut page = Self::page(values, start, total, confidence, more);
        if default_selected < page.values.len() {
            page.default_selected = Some(default_selected);
        }
        page
    }

    /// An empty page: `Failed` when the error flag is set, `NoValue`
    /// otherwise.
    pub fn empty(is_error: bool) -> Self {
        let confidence = if is_error {
            Confidence::Failed
        } else {
            Confidence::NoValue
        };
        Self::with_confidence(confidence)
    }

    /// An empty page at a caller-chosen confidence (`NotFound`,
    /// `Rejected`, ...).
    pub fn with_confidence(confidence: Confidence) -> Self {
        Self {
            values: Vec::new(),
            confidence,
            start: 0,
            total: 0,
            more: false,
            default_selected: None,
        }
    }

    /// True iff this page reports a failure rather than a result.
    pub fn is_error(&self) -> bool {
        matches!(self.confidence, Confidence::Failed | Confidence::Rejected)
    }
}
