//! The storage engine: an in-memory registry backed by one JSON file.

use crate::config::{ReloadPolicy, StorageConfig};
use crate::error::{StorageError, StorageResult};
use hbnb_model::{composite_key, split_key, Entity, EntityId, KindRegistry, ModelError, ID_KEY};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An entry that lenient reload could not rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: String,
}

/// Outcome of a successful [`FileStorage::reload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Entries rebuilt and merged into the registry.
    pub loaded: usize,
    /// Entries dropped under [`ReloadPolicy::Lenient`].
    pub skipped: Vec<SkippedEntry>,
}

/// Owns every live entity, keyed by `<kind>.<id>`, and the file they are
/// saved to.
///
/// Single writer: every mutation takes `&mut self`. Callers sharing one
/// store across threads must wrap it in a lock.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    pretty: bool,
    reload_policy: ReloadPolicy,
    kinds: KindRegistry,
    objects: BTreeMap<String, Entity>,
}

impl FileStorage {
    /// Creates an empty store backed by `path`. Nothing is read until
    /// [`FileStorage::reload`].
    pub fn new(path: impl Into<PathBuf>, kinds: KindRegistry) -> Self {
        Self::with_config(StorageConfig::for_path(path), kinds)
    }

    /// Creates an empty store from explicit settings.
    pub fn with_config(config: StorageConfig, kinds: KindRegistry) -> Self {
        Self {
            path: config.file_path,
            pretty: config.pretty,
            reload_policy: config.reload_policy,
            kinds,
            objects: BTreeMap::new(),
        }
    }

    /// Creates a store and reloads it from disk.
    pub fn open(config: StorageConfig, kinds: KindRegistry) -> StorageResult<Self> {
        let mut storage = Self::with_config(config, kinds);
        storage.reload()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    pub fn reload_policy(&self) -> ReloadPolicy {
        self.reload_policy
    }

    // ── Registry ─────────────────────────────────────────────────

    /// The live registry, keyed by `<kind>.<id>`.
    pub fn all(&self) -> &BTreeMap<String, Entity> {
        &self.objects
    }

    /// Entities of one kind, in key order.
    pub fn all_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.objects.values().filter(move |e| e.kind() == kind)
    }

    /// Entities for display, optionally restricted to one registered kind.
    pub fn list(&self, kind: Option<&str>) -> StorageResult<Vec<&Entity>> {
        match kind {
            None => Ok(self.objects.values().collect()),
            Some(kind) => {
                if !self.kinds.contains(kind) {
                    return Err(StorageError::UnknownKind(kind.to_string()));
                }
                Ok(self.objects.values().filter(|e| e.kind() == kind).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Registers an entity under its key. An existing entry with the same
    /// key is replaced.
    ///
    /// The entity's kind must be registered, so that whatever gets persisted
    /// can be rebuilt by [`FileStorage::reload`].
    pub fn insert(&mut self, entity: Entity) -> StorageResult<()> {
        if !self.kinds.contains(entity.kind()) {
            return Err(StorageError::UnknownKind(entity.kind().to_string()));
        }
        let key = entity.key();
        debug!("Registering {}", key);
        if self.objects.insert(key.clone(), entity).is_some() {
            warn!("Registry already held {}, replaced it", key);
        }
        Ok(())
    }

    pub fn get(&self, kind: &str, id: &str) -> Option<&Entity> {
        self.objects.get(&composite_key(kind, id))
    }

    pub fn get_mut(&mut self, kind: &str, id: &str) -> Option<&mut Entity> {
        self.objects.get_mut(&composite_key(kind, id))
    }

    pub fn contains(&self, kind: &str, id: &str) -> bool {
        self.objects.contains_key(&composite_key(kind, id))
    }

    // ── Operations used by a command front end ───────────────────

    /// Creates a fresh entity of a registered kind and registers it.
    /// Nothing is written until the next save.
    pub fn create(&mut self, kind: &str) -> StorageResult<EntityId> {
        let entity = self.kinds.fresh(kind)?;
        let id = entity.id().clone();
        self.insert(entity)?;
        Ok(id)
    }

    /// Creates a fresh entity and writes the store.
    pub fn create_and_save(&mut self, kind: &str) -> StorageResult<EntityId> {
        let id = self.create(kind)?;
        self.persist()?;
        Ok(id)
    }

    /// Refreshes an entity's `updated_at` and writes the whole store.
    pub fn save(&mut self, kind: &str, id: &str) -> StorageResult<()> {
        self.entity_mut(kind, id)?.touch();
        self.persist()
    }

    /// Sets one attribute on an entity, then saves it.
    pub fn update(
        &mut self,
        kind: &str,
        id: &str,
        attribute: &str,
        value: impl Into<Value>,
    ) -> StorageResult<()> {
        let entity = self.entity_mut(kind, id)?;
        entity.set_attribute(attribute, value)?;
        entity.touch();
        debug!("Updated {}.{} attribute {}", kind, id, attribute);
        self.persist()
    }

    /// Removes an entity and writes the store. Returns the removed entity.
    pub fn destroy(&mut self, kind: &str, id: &str) -> StorageResult<Entity> {
        if !self.kinds.contains(kind) {
            return Err(StorageError::UnknownKind(kind.to_string()));
        }
        let key = composite_key(kind, id);
        let entity = self
            .objects
            .remove(&key)
            .ok_or_else(|| StorageError::NotFound(key.clone()))?;
        debug!("Removed {}", key);
        self.persist()?;
        Ok(entity)
    }

    fn entity_mut(&mut self, kind: &str, id: &str) -> StorageResult<&mut Entity> {
        if !self.kinds.contains(kind) {
            return Err(StorageError::UnknownKind(kind.to_string()));
        }
        let key = composite_key(kind, id);
        self.objects
            .get_mut(&key)
            .ok_or(StorageError::NotFound(key))
    }

    // ── File ─────────────────────────────────────────────────────

    /// Writes the whole registry to the store file.
    ///
    /// The document goes to `<path>.tmp` first and is renamed into place,
    /// so a crash mid-write leaves the previous file intact. The registry
    /// itself is never modified.
    pub fn persist(&self) -> StorageResult<()> {
        let document: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.clone(), Value::Object(entity.to_dict())))
            .collect();
        let document = Value::Object(document);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = tmp_path(&self.path);
        let written = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!("Persisted {} entities to {:?}", self.objects.len(), self.path);
        Ok(())
    }

    /// Loads the store file and merges its entities into the registry.
    ///
    /// A missing file is an empty store. Entries already in the registry
    /// are replaced by the file's version.
    pub fn reload(&mut self) -> StorageResult<ReloadReport> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No store file at {:?}, starting empty", self.path);
                return Ok(ReloadReport::default());
            }
            Err(e) => return Err(e.into()),
        };

        let document: Value = serde_json::from_str(&contents).map_err(|e| {
            StorageError::CorruptStore(format!("{}: {}", self.path.display(), e))
        })?;
        let Value::Object(entries) = document else {
            return Err(StorageError::CorruptStore(format!(
                "{}: top-level value is not an object",
                self.path.display()
            )));
        };

        let mut report = ReloadReport::default();
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match self.load_entry(&key, value) {
                Ok(entity) => staged.push((key, entity)),
                Err(err) => match self.reload_policy {
                    ReloadPolicy::Strict => {
                        warn!("Reload of {:?} aborted at {}: {}", self.path, key, err);
                        return Err(err);
                    }
                    ReloadPolicy::Lenient => {
                        warn!("Skipping stored entry {}: {}", key, err);
                        report.skipped.push(SkippedEntry {
                            key,
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        report.loaded = staged.len();
        self.objects.extend(staged);
        info!(
            "Reloaded {} entities from {:?} ({} skipped)",
            report.loaded,
            self.path,
            report.skipped.len()
        );
        Ok(report)
    }

    fn load_entry(&self, key: &str, value: Value) -> StorageResult<Entity> {
        let (kind, id) = split_key(key)
            .ok_or_else(|| StorageError::CorruptStore(format!("malformed key {key:?}")))?;
        let Value::Object(mut dict) = value else {
            return Err(StorageError::CorruptStore(format!(
                "entry {key} is not an object"
            )));
        };

        match dict.get(ID_KEY) {
            None => {
                dict.insert(ID_KEY.into(), Value::String(id.to_string()));
            }
            Some(stored) if stored.as_str() == Some(id) => {}
            Some(stored) => {
                return Err(StorageError::CorruptStore(format!(
                    "entry {key} carries id {stored}"
                )));
            }
        }

        self.kinds.reconstruct(kind, dict).map_err(|e| match e {
            ModelError::MalformedTimestamp { .. } | ModelError::UnknownKind(_) => e.into(),
            other => StorageError::CorruptStore(format!("entry {key}: {other}")),
        })
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
