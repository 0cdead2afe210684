use authority_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// A query-style call was made for a field with no bound authority.
    #[error("no authority is configured for field {field}")]
    NotConfigured { field: String },

    /// A hierarchy operation was requested against a flat backend. This
    /// is a configuration error, not a data error.
    #[error("authority '{authority}' bound to field {field} is not hierarchical")]
    NotHierarchical { field: String, authority: String },

    /// The submission forms reference an authority name with no
    /// registered plugin, pairs list, or vocabulary file behind it.
    #[error("authority '{name}' referenced by form '{form}' has no backend")]
    UnknownAuthority { name: String, form: String },

    /// A value was written to an authority-required field without an
    /// authority key.
    #[error("field {field} requires an authority key but none was supplied")]
    MissingRequiredAuthority { field: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AuthorityError>;
