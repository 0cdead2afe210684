//! The authority assignment rule applied when metadata values are written.

use authority_model::{Confidence, FieldKey};

use crate::error::{AuthorityError, Result};
use crate::policy::AuthorityPolicySet;

/// What gets stored on a metadata value after the assignment rule runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedAuthority {
    pub authority: Option<String>,
    pub confidence: Confidence,
}

/// Decide the authority key and confidence to store for one value.
///
/// - A non-empty supplied key is kept, with the supplied confidence or
///   `NoValue` when none was given.
/// - An empty/absent key stores no authority; a supplied confidence is
///   kept as-is, else `Unset`. Keeping a high supplied confidence (for
///   example `Accepted`) with no key is intentional: it is how a curator
///   explicitly clears a key while confirming the bare value.
/// - An empty/absent key on a field whose policy says authority is
///   required rejects the write.
/// - On a field that is not authority-controlled, a supplied key is
///   dropped with a warning rather than stored.
pub fn assign_authority(
    policy: &AuthorityPolicySet,
    field: &FieldKey,
    supplied_authority: Option<&str>,
    supplied_confidence: Option<Confidence>,
) -> Result<AppliedAuthority> {
    let key = supplied_authority
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if !policy.is_controlled(field) {
        if let Some(key) = key {
            tracing::warn!(
                field = %field,
                authority = key,
                "dropping authority key supplied for an uncontrolled field"
            );
        }
        return Ok(AppliedAuthority {
            authority: None,
            confidence: supplied_confidence.unwrap_or(Confidence::Unset),
        });
    }

    match key {
        Some(key) => Ok(AppliedAuthority {
            authority: Some(key.to_string()),
            confidence: supplied_confidence.unwrap_or(Confidence::NoValue),
        }),
        None => {
            if policy.is_required(field) {
                return Err(AuthorityError::MissingRequiredAuthority {
                    field: field.as_str().to_string(),
                });
            }
            Ok(AppliedAuthority {
                authority: None,
                confidence: supplied_confidence.unwrap_or(Confidence::Unset),
            })
        }
    }
}
