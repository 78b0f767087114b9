//! Error types for the entity model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or editing entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A stored timestamp is not in the canonical format.
    #[error("malformed timestamp in {field}: {value:?}")]
    MalformedTimestamp { field: String, value: String },

    /// No factory is registered for this kind.
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    /// The discriminator in a dictionary names a different kind.
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    /// A reserved field has the wrong shape.
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Attempted to overwrite `id`, a timestamp, or the discriminator.
    #[error("attribute is reserved: {0}")]
    ReservedAttribute(String),

    /// `created_at` is later than `updated_at`.
    #[error("created_at {created_at} is later than updated_at {updated_at}")]
    TimestampOrder {
        created_at: String,
        updated_at: String,
    },

    /// Kind names must be non-empty and contain no `.`.
    #[error("invalid kind name: {0:?}")]
    InvalidKindName(String),

    /// A kind's validation hook rejected the entity.
    #[error("validation failed: {0}")]
    Validation(String),
}
