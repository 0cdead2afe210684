//! Authority backends: the `ChoiceAuthority` capability contract, the
//! explicit plugin registry, and the built-in value-pairs and vocabulary
//! implementations.

pub mod authority;
pub mod pairs;
pub mod registry;
pub mod vocabulary;

pub use authority::{ChoiceAuthority, HierarchicalAuthority, page_from_matches};
pub use pairs::ValuePairsAuthority;
pub use registry::PluginRegistry;
pub use vocabulary::VocabularyAuthority;
