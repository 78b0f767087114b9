//! Core type definitions for the HBnB object store.
//!
//! This crate defines the small value types every other crate agrees on:
//! - Entity identifiers (random UUID v4 text, kept verbatim once assigned)
//! - Wall-clock timestamps with a fixed canonical text form
//!
//! Entity shapes and storage live in `hbnb-model` and `hbnb-storage`.

mod ids;
mod timestamp;

pub use ids::EntityId;
pub use timestamp::{Timestamp, TIMESTAMP_FORMAT};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("entity id must not be empty")]
    EmptyId,
}
