//! In-memory storage adapter for tests and dry runs.

use std::collections::BTreeMap;

use filevault_common::paths::normalize_path;
use filevault_common::{Error, Result};
use parking_lot::RwLock;

use super::StorageAdapter;

/// Keeps file contents in a map keyed by normalized path.
pub struct MemoryAdapter {
    name: String,
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// Snapshot of all stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.files.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl StorageAdapter for MemoryAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .read()
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| Error::storage(&self.name, format!("no such file: {path}")))
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        self.files
            .write()
            .insert(normalize_path(path), content.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<bool> {
        Ok(self.files.write().remove(&normalize_path(path)).is_some())
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.files.read().contains_key(&normalize_path(path)))
    }
}
