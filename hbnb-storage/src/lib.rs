//! JSON file storage engine for the HBnB object store.
//!
//! Keeps every live entity in memory, keyed by `<kind>.<id>`, and writes the
//! whole registry to a single JSON file on every save.
//!
//! # Architecture
//!
//! - [`FileStorage`] owns the registry and the file path. It is an explicit
//!   value, built once at start-up and passed to whoever needs it.
//! - Reload rebuilds typed entities through the [`KindRegistry`]; kinds are
//!   registered up front, never discovered.
//! - Writes go to `<path>.tmp` and are renamed over the store file.
//! - [`StorageConfig`] is read from an optional TOML file.

mod config;
mod error;
mod file_storage;

pub use config::{ReloadPolicy, StorageConfig, DEFAULT_FILE_PATH};
pub use error::{StorageError, StorageResult};
pub use file_storage::{FileStorage, ReloadReport, SkippedEntry};

pub use hbnb_model::{Entity, EntityId, KindRegistry};
