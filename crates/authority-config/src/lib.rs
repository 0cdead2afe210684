//! Configuration surface for authority control: the flat key/value store,
//! submission-form definitions, and controlled-vocabulary files.

pub mod config;
pub mod error;
pub mod forms;
pub mod vocabulary;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use forms::{
    FormDefinition, FormField, StaticForms, SubmissionConfigService, TomlFormReader, ValuePair,
};
pub use vocabulary::{VocabularyFile, VocabularyNode};
