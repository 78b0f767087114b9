//! Shared test helpers for storage tests.

#![allow(dead_code)]

use hbnb_storage::{FileStorage, KindRegistry, ReloadPolicy, StorageConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry with `BaseModel`, `Widget` and `Gadget`.
pub fn kinds() -> KindRegistry {
    let mut kinds = KindRegistry::with_defaults();
    kinds.register_plain("Widget").unwrap();
    kinds.register_plain("Gadget").unwrap();
    kinds
}

/// A temp dir and the store path inside it.
pub fn temp_store() -> (TempDir, PathBuf) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.json");
    (dir, path)
}

pub fn storage_at(path: &Path) -> FileStorage {
    FileStorage::new(path, kinds())
}

pub fn lenient_storage_at(path: &Path) -> FileStorage {
    let config = StorageConfig {
        reload_policy: ReloadPolicy::Lenient,
        ..StorageConfig::for_path(path)
    };
    FileStorage::with_config(config, kinds())
}

/// Reads the store file as a JSON value.
pub fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
