use thiserror::Error;

/// Structural problems detected in an already-parsed `FormConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("field id '{id}' is declared more than once")]
    DuplicateFieldId { id: String },
    #[error("field '{dependent}' depends on unknown field '{controller}'")]
    UnknownController {
        dependent: String,
        controller: String,
    },
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("failed to fetch form configuration '{kind}': {source}")]
    ConfigFetch {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no field with id '{0}' is rendered")]
    UnknownField(String),
    #[error("field '{0}' is suppressed for the active role")]
    NotInteractive(String),
    #[error("failed to serialize submission snapshot")]
    Snapshot(#[from] serde_json::Error),
}

pub type FormResult<T> = Result<T, FormError>;
