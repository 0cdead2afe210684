//! Value types shared by every authority control component: the closed
//! confidence enumeration, candidate choices and result pages, and
//! normalized field keys.

pub mod choice;
pub mod confidence;
pub mod field;

pub use choice::{Choice, Choices};
pub use confidence::Confidence;
pub use field::{DsoType, FieldKey};
