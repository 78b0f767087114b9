//! Error types for the storage layer.

use hbnb_model::ModelError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored timestamp is not in the canonical format.
    #[error("malformed timestamp in {field}: {value:?}")]
    MalformedTimestamp { field: String, value: String },

    /// A kind with no registered factory.
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    /// The store file is not a JSON object of objects, or an entry is
    /// malformed.
    #[error("corrupt store: {0}")]
    CorruptStore(String),

    /// No entity under this key.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Any other model error (reserved attribute, validation, ...).
    #[error("model error: {0}")]
    Model(#[source] ModelError),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ModelError> for StorageError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MalformedTimestamp { field, value } => {
                Self::MalformedTimestamp { field, value }
            }
            ModelError::UnknownKind(kind) => Self::UnknownKind(kind),
            other => Self::Model(other),
        }
    }
}
