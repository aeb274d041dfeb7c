//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires an in-memory record store, a memory
//! storage adapter, a [`VersionResolver`] and a [`LifecycleCoordinator`]
//! together, plus a [`RecordingHook`] that logs every lifecycle event.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use filevault::config::{parse_config, Config};
use filevault::images::{VariantCleanupHook, VersionResolver};
use filevault::lifecycle::{
    HookContext, HookOutcome, LifecycleCoordinator, LifecycleHook, Persisted, RecordStore,
};
use filevault::storage::{AdapterRegistry, MemoryAdapter};
use filevault_common::{FileId, Result, StoredFileRecord};

/// Tag of the memory adapter every harness registers.
pub const ADAPTER: &str = "Mem";

/// Configuration shared by most integration tests.
pub const SAMPLE_CONFIG: &str = r#"
[paths]
template = "{model}/{hash}/{id}/{version}"
url_prefix = "https://files.example.com"
hash_levels = 2
hash_width = 2

[image_sizes.Avatar]
thumbnail = { width = ["<=", 150], height = ["<=", 150] }
medium = { width = ["<=", 400] }

[image_hashes.Avatar]
thumbnail = "thumb-salt"

[adapters.Mem]
kind = "memory"
"#;

/// Record rows kept in a map, standing in for the host's database.
#[derive(Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<FileId, StoredFileRecord>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.read().contains_key(&FileId::from(id))
    }
}

impl RecordStore for InMemoryStore {
    fn get(&self, id: &FileId) -> Result<Option<StoredFileRecord>> {
        Ok(self.rows.read().get(id).cloned())
    }

    fn save(&self, record: &StoredFileRecord) -> Result<Persisted> {
        match self.rows.write().insert(record.id.clone(), record.clone()) {
            None => Ok(Persisted::Created),
            Some(_) => Ok(Persisted::Updated),
        }
    }

    fn delete(&self, id: &FileId) -> Result<bool> {
        Ok(self.rows.write().remove(id).is_some())
    }
}

/// Hook that records `phase:id` for every event and can veto phases.
#[derive(Default)]
pub struct RecordingHook {
    events: Mutex<Vec<String>>,
    pub stop_save: bool,
    pub stop_delete: bool,
}

impl RecordingHook {
    pub fn stopping_deletes() -> Self {
        Self {
            stop_delete: true,
            ..Self::default()
        }
    }

    pub fn stopping_saves() -> Self {
        Self {
            stop_save: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, phase: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.split(':').next() == Some(phase))
            .count()
    }

    fn push(&self, phase: &str, ctx: &HookContext<'_>) {
        self.events.lock().push(format!("{}:{}", phase, ctx.record.id));
    }
}

impl LifecycleHook for RecordingHook {
    fn name(&self) -> &str {
        "recording"
    }

    fn before_save(&self, ctx: &HookContext<'_>) -> HookOutcome {
        self.push("before_save", ctx);
        if self.stop_save {
            HookOutcome::Stop
        } else {
            HookOutcome::Continue
        }
    }

    fn after_save(&self, ctx: &HookContext<'_>) {
        self.push("after_save", ctx);
    }

    fn before_delete(&self, ctx: &HookContext<'_>) -> HookOutcome {
        self.push("before_delete", ctx);
        if self.stop_delete {
            HookOutcome::Stop
        } else {
            HookOutcome::Continue
        }
    }

    fn after_delete(&self, ctx: &HookContext<'_>) {
        self.push("after_delete", ctx);
    }
}

/// Fully wired resolver, store, adapter and coordinator.
pub struct TestHarness {
    pub config: Config,
    pub resolver: Arc<VersionResolver>,
    pub store: Arc<InMemoryStore>,
    pub adapter: Arc<MemoryAdapter>,
    pub adapters: Arc<AdapterRegistry>,
}

impl TestHarness {
    /// Create a harness from [`SAMPLE_CONFIG`].
    pub fn new() -> Self {
        Self::with_config(parse_config(SAMPLE_CONFIG).expect("sample config is valid"))
    }

    /// Create a harness with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let resolver =
            Arc::new(VersionResolver::from_config(&config).expect("failed to build resolver"));
        let adapter = Arc::new(MemoryAdapter::new(ADAPTER));
        let adapters = Arc::new(AdapterRegistry::new().with(adapter.clone()));

        Self {
            config,
            resolver,
            store: Arc::new(InMemoryStore::default()),
            adapter,
            adapters,
        }
    }

    /// A coordinator over this harness's store with the given hooks.
    pub fn coordinator(&self, hooks: Vec<Arc<dyn LifecycleHook>>) -> LifecycleCoordinator {
        LifecycleCoordinator::new(self.store.clone(), self.adapters.clone()).with_hooks(hooks)
    }

    /// A coordinator that removes image variants on delete.
    pub fn coordinator_with_cleanup(&self) -> LifecycleCoordinator {
        self.coordinator(vec![Arc::new(VariantCleanupHook::new(self.resolver.clone()))])
    }

    /// A record on the memory adapter.
    pub fn record(&self, model: &str, id: &str) -> StoredFileRecord {
        StoredFileRecord::new(FileId::from(id), model, ADAPTER)
    }
}
