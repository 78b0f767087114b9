//! Core entity model for the HBnB object store.
//!
//! Defines the types every stored object goes through:
//! - [`Entity`]: identity, timestamps, kind, and an open attribute bag
//! - [`Attributes`]: the bag itself, a sorted map of JSON values
//! - [`KindRegistry`]: the closed set of kinds the store can rebuild
//! - [`EntityFactory`] / [`EntityKind`]: per-kind construction and hooks
//!
//! `to_dict` and `from_dict` are the only serialization contract the
//! storage layer relies on.

mod entity;
mod error;
mod registry;

pub use entity::{
    composite_key, split_key, Attributes, Entity, CREATED_AT_KEY, ID_KEY, KIND_KEY,
    RESERVED_KEYS, UPDATED_AT_KEY,
};
pub use error::{ModelError, ModelResult};
pub use registry::{EntityFactory, EntityKind, KindRegistry, BASE_MODEL};

pub use hbnb_types::{EntityId, Timestamp};
