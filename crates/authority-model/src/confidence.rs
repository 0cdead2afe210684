//! Confidence levels attached to authority lookups.
//!
//! Every authority backend, regardless of mechanism (lookup table, SQL,
//! search index, remote vocabulary service), maps its outcome onto exactly
//! one of these eight levels. The numeric codes are what gets persisted
//! alongside a metadata value; the symbolic names appear in configuration
//! and serialized result pages.

use serde::{Deserialize, Serialize};

/// How certain an authority source is about a match.
///
/// Ordered: a higher level is more trustworthy. `Accepted` is the maximum
/// and the usual minimum threshold for treating a stored key as confirmed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    /// No confidence value has been set yet.
    #[default]
    Unset,
    /// There is no authority value for this metadata value.
    NoValue,
    /// Every proposed match was rejected by a human.
    Rejected,
    /// The lookup itself failed (backend error).
    Failed,
    /// The source found no match at all.
    NotFound,
    /// The source found two or more candidate matches.
    Ambiguous,
    /// The source found a single unconfirmed candidate.
    Uncertain,
    /// The match is confirmed.
    Accepted,
}

/// All members in ascending order of trust.
const ALL: &[Confidence] = &[
    Confidence::Unset,
    Confidence::NoValue,
    Confidence::Rejected,
    Confidence::Failed,
    Confidence::NotFound,
    Confidence::Ambiguous,
    Confidence::Uncertain,
    Confidence::Accepted,
];

impl Confidence {
    /// The persisted numeric code for this level.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Unset => -1,
            Self::NoValue => 0,
            Self::Rejected => 100,
            Self::Failed => 200,
            Self::NotFound => 300,
            Self::Ambiguous => 400,
            Self::Uncertain => 500,
            Self::Accepted => 600,
        }
    }

    /// The symbolic name used in configuration and serialized pages.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::NoValue => "NOVALUE",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
            Self::NotFound => "NOTFOUND",
            Self::Ambiguous => "AMBIGUOUS",
            Self::Uncertain => "UNCERTAIN",
            Self::Accepted => "ACCEPTED",
        }
    }

    /// Translate a persisted numeric code back to a level.
    pub fn from_code(code: i32) -> Option<Self> {
        ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Translate a symbolic name (case-insensitive) back to a level.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let key = symbol.trim();
        ALL.iter()
            .copied()
            .find(|c| c.symbol().eq_ignore_ascii_case(key))
    }

    /// Translate a symbolic name, falling back to a caller-supplied default
    /// for unknown names.
    pub fn from_symbol_or(symbol: &str, default: Self) -> Self {
        Self::from_symbol(symbol).unwrap_or(default)
    }

    /// Translate a symbolic name, falling back to `NoValue` for unknown
    /// names. This is the documented default for untrusted input such as
    /// configuration values.
    pub fn from_symbol_or_novalue(symbol: &str) -> Self {
        Self::from_symbol_or(symbol, Self::NoValue)
    }

    /// All levels in ascending order of trust.
    pub const fn all() -> &'static [Confidence] {
        ALL
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn codes_are_ordered() {
        let codes: Vec<i32> = Confidence::all().iter().map(Confidence::code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert!(Confidence::Accepted > Confidence::Uncertain);
        assert!(Confidence::Rejected < Confidence::NotFound);
        assert!(Confidence::Unset < Confidence::NoValue);
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        assert_eq!(
            Confidence::from_symbol("accepted"),
            Some(Confidence::Accepted)
        );
        assert_eq!(
            Confidence::from_symbol(" Ambiguous "),
            Some(Confidence::Ambiguous)
        );
        assert_eq!(Confidence::from_symbol("bogus"), None);
    }

    #[test]
    fn unknown_symbol_falls_back() {
        assert_eq!(
            Confidence::from_symbol_or("bogus", Confidence::Uncertain),
            Confidence::Uncertain
        );
        assert_eq!(
            Confidence::from_symbol_or_novalue("bogus"),
            Confidence::NoValue
        );
        assert_eq!(Confidence::from_symbol_or_novalue("bogus").code(), 0);
    }

    fn any_confidence() -> impl Strategy<Value = Confidence> {
        prop::sample::select(Confidence::all().to_vec())
    }

    proptest! {
        #[test]
        fn symbol_round_trips(c in any_confidence()) {
            prop_assert_eq!(Confidence::from_symbol(c.symbol()), Some(c));
        }

        #[test]
        fn code_round_trips(c in any_confidence()) {
            prop_assert_eq!(Confidence::from_code(c.code()), Some(c));
        }

        #[test]
        fn order_follows_codes(a in any_confidence(), b in any_confidence()) {
            prop_assert_eq!(a.cmp(&b), a.code().cmp(&b.code()));
        }
    }
}
