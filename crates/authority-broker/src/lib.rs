//! The choice-authority broker: maps a metadata field plus its
//! collection/form context to an authority backend, exposes the uniform
//! query API over the resolved backend, and owns the per-field authority
//! policy and the value-write assignment rule.

pub mod assign;
pub mod error;
pub mod policy;
pub mod registry;
pub mod service;

pub use assign::{AppliedAuthority, assign_authority};
pub use error::{AuthorityError, Result};
pub use policy::AuthorityPolicySet;
pub use registry::{Binding, BindingKey, RegistrySnapshot, RegistrySummary};
pub use service::ChoiceAuthorityService;
