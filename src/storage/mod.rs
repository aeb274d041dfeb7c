//! Storage adapter boundary.
//!
//! Filevault never moves bytes itself beyond what lifecycle consumers ask for.
//! It only looks up the [`StorageAdapter`] named by a record's `adapter` tag
//! and hands it to hooks. Paths passed to adapters are relative and
//! forward-slash separated.

mod local;
mod memory;

pub use local::LocalAdapter;
pub use memory::MemoryAdapter;

use std::sync::Arc;

use filevault_common::{Error, Result};
use indexmap::IndexMap;

use crate::config::{AdapterKind, Config};

/// A physical storage backend.
pub trait StorageAdapter: Send + Sync {
    /// The tag this adapter is registered under.
    fn name(&self) -> &str;

    /// Read the full contents at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Write `content` to `path`, creating parents as needed.
    fn write(&self, path: &str, content: &[u8]) -> Result<()>;

    /// Remove `path`. Returns `false` if nothing was stored there.
    fn delete(&self, path: &str) -> Result<bool>;

    /// Whether anything is stored at `path`.
    fn exists(&self, path: &str) -> Result<bool>;
}

/// Adapters keyed by tag.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: IndexMap<String, Arc<dyn StorageAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters from the `[adapters]` configuration section.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();
        for (name, adapter) in &config.adapters {
            let built: Arc<dyn StorageAdapter> = match adapter.kind {
                AdapterKind::Local => {
                    let root = adapter.root.clone().ok_or_else(|| {
                        Error::configuration(format!(
                            "adapter '{name}' is local but has no root directory"
                        ))
                    })?;
                    Arc::new(LocalAdapter::new(name.clone(), root))
                }
                AdapterKind::Memory => Arc::new(MemoryAdapter::new(name.clone())),
            };
            registry.register(built);
        }
        Ok(registry)
    }

    /// Register an adapter under its own name, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn StorageAdapter>) {
        tracing::debug!("Registering storage adapter '{}'", adapter.name());
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, adapter: Arc<dyn StorageAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Look up the adapter for a record's tag.
    pub fn adapter_for(&self, tag: &str) -> Result<Arc<dyn StorageAdapter>> {
        self.adapters
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::not_found("adapter", tag))
    }

    /// Registered tags in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
