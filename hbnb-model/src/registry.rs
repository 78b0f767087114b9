//! The closed set of entity kinds the store knows how to rebuild.
//!
//! Every kind is registered once at start-up, before the store is reloaded.
//! Nothing is discovered at runtime: a stored key whose kind was never
//! registered fails with [`ModelError::UnknownKind`].

use crate::{Attributes, Entity, ModelError, ModelResult};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// The one kind the store ships with.
pub const BASE_MODEL: &str = "BaseModel";

/// Builds an entity of a given kind from a stored dictionary.
///
/// Implemented for any `Fn(&str, Attributes) -> ModelResult<Entity>`, so a
/// plain function or closure can be registered directly.
pub trait EntityFactory: Send + Sync {
    fn build(&self, kind: &str, dict: Attributes) -> ModelResult<Entity>;
}

impl<F> EntityFactory for F
where
    F: Fn(&str, Attributes) -> ModelResult<Entity> + Send + Sync,
{
    fn build(&self, kind: &str, dict: Attributes) -> ModelResult<Entity> {
        self(kind, dict)
    }
}

/// Optional per-kind hooks run after reconstruction.
///
/// Most kinds do not need this; the plain factory is enough. Implement it
/// for kinds that derive fields or reject bad stored data.
pub trait EntityKind: Send + Sync {
    /// Called on every entity rebuilt from storage, before validation.
    fn on_after_load(&self, entity: &mut Entity) {
        let _ = entity;
    }

    /// Validate an entity rebuilt from storage.
    /// Return `Err(message)` to reject it.
    fn validate(&self, entity: &Entity) -> Result<(), String> {
        let _ = entity;
        Ok(())
    }
}

fn plain_factory(kind: &str, dict: Attributes) -> ModelResult<Entity> {
    Entity::from_dict(kind, dict)
}

struct Registration {
    factory: Box<dyn EntityFactory>,
    hooks: Option<Box<dyn EntityKind>>,
}

/// Maps kind names to the factory that rebuilds them.
#[derive(Default)]
pub struct KindRegistry {
    kinds: BTreeMap<String, Registration>,
}

impl KindRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with [`BASE_MODEL`] registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(BASE_MODEL.to_string(), Box::new(plain_factory), None);
        registry
    }

    /// Associates a kind name with a factory. Replaces any earlier
    /// registration of the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl EntityFactory + 'static,
    ) -> ModelResult<()> {
        let name = checked_name(name.into())?;
        self.insert(name, Box::new(factory), None);
        Ok(())
    }

    /// Registers a kind rebuilt with [`Entity::from_dict`].
    pub fn register_plain(&mut self, name: impl Into<String>) -> ModelResult<()> {
        self.register(name, plain_factory)
    }

    /// Registers a kind rebuilt with [`Entity::from_dict`] and then passed
    /// through `hooks`.
    pub fn register_with_hooks(
        &mut self,
        name: impl Into<String>,
        hooks: impl EntityKind + 'static,
    ) -> ModelResult<()> {
        let name = checked_name(name.into())?;
        self.insert(name, Box::new(plain_factory), Some(Box::new(hooks)));
        Ok(())
    }

    /// Returns the factory for `name`.
    pub fn resolve(&self, name: &str) -> ModelResult<&dyn EntityFactory> {
        self.kinds
            .get(name)
            .map(|r| r.factory.as_ref())
            .ok_or_else(|| ModelError::UnknownKind(name.to_string()))
    }

    /// Rebuilds an entity of kind `name` from a stored dictionary, running
    /// the kind's hooks if it has any.
    pub fn reconstruct(&self, name: &str, dict: Attributes) -> ModelResult<Entity> {
        let registration = self
            .kinds
            .get(name)
            .ok_or_else(|| ModelError::UnknownKind(name.to_string()))?;

        let mut entity = registration.factory.build(name, dict)?;
        if entity.kind() != name {
            return Err(ModelError::KindMismatch {
                expected: name.to_string(),
                found: entity.kind().to_string(),
            });
        }

        if let Some(hooks) = &registration.hooks {
            hooks.on_after_load(&mut entity);
            hooks.validate(&entity).map_err(ModelError::Validation)?;
        }
        Ok(entity)
    }

    /// Creates a fresh entity of a registered kind.
    pub fn fresh(&self, name: &str) -> ModelResult<Entity> {
        if !self.contains(name) {
            return Err(ModelError::UnknownKind(name.to_string()));
        }
        Ok(Entity::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn insert(
        &mut self,
        name: String,
        factory: Box<dyn EntityFactory>,
        hooks: Option<Box<dyn EntityKind>>,
    ) {
        debug!("Registering entity kind {}", name);
        if self
            .kinds
            .insert(name.clone(), Registration { factory, hooks })
            .is_some()
        {
            warn!("Entity kind {} was already registered, replacing it", name);
        }
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.keys()).finish()
    }
}

fn checked_name(name: String) -> ModelResult<String> {
    if name.is_empty() || name.contains('.') {
        return Err(ModelError::InvalidKindName(name));
    }
    Ok(name)
}
