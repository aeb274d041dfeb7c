//! Save/delete sequencing around the host persistence layer.
//!
//! The [`LifecycleCoordinator`] wraps each persistence operation in a
//! before/after pair of notifications:
//!
//! - **save**: `before_save` (may stop) → store write → `after_save` only for
//!   newly created records → removal of the record the save superseded.
//! - **delete**: snapshot → `before_delete` (may stop) → store delete →
//!   `after_delete` with the snapshot.
//!
//! A stop in a before-phase is reported as `Ok(false)` and leaves the store
//! untouched.

mod hooks;
mod store;

pub use hooks::{HookContext, HookOutcome, LifecycleHook};
pub use store::{Persisted, RecordStore};

use std::sync::Arc;

use filevault_common::{Error, FileId, Result, StoredFileRecord};

use crate::storage::AdapterRegistry;

/// Runs lifecycle hooks around record saves and deletes.
pub struct LifecycleCoordinator {
    store: Arc<dyn RecordStore>,
    adapters: Arc<AdapterRegistry>,
    hooks: Vec<Arc<dyn LifecycleHook>>,
}

impl LifecycleCoordinator {
    /// Create a coordinator with no hooks installed.
    pub fn new(store: Arc<dyn RecordStore>, adapters: Arc<AdapterRegistry>) -> Self {
        Self {
            store,
            adapters,
            hooks: Vec::new(),
        }
    }

    /// Install a hook. Hooks run in the order they were added.
    pub fn with_hook(mut self, hook: Arc<dyn LifecycleHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Install a whole hook set.
    pub fn with_hooks(mut self, hooks: impl IntoIterator<Item = Arc<dyn LifecycleHook>>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Names of installed hooks, in run order.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Save a record.
    ///
    /// `supersedes` names a previously stored record this one replaces; it is
    /// deleted (through [`delete`](Self::delete)) after a successful create.
    ///
    /// Returns `Ok(false)` if a `before_save` hook stopped the save.
    pub fn save(&self, record: &StoredFileRecord, supersedes: Option<&FileId>) -> Result<bool> {
        if record.id.is_empty() {
            return Err(Error::invalid_argument("cannot save a record without an id"));
        }

        // Resolve the adapter before anything is written
        let adapter = self.adapters.adapter_for(&record.adapter)?;
        let ctx = HookContext {
            record,
            adapter: adapter.as_ref(),
        };

        if let Some(hook) = self.first_stop(|hook| hook.before_save(&ctx)) {
            tracing::info!("Save of {} ({}) stopped by hook '{}'", record.id, record.model, hook);
            return Ok(false);
        }

        match self.store.save(record)? {
            Persisted::Created => {
                for hook in &self.hooks {
                    hook.after_save(&ctx);
                }
                tracing::info!("Created {} ({}) on adapter {}", record.id, record.model, record.adapter);

                if let Some(old) = supersedes.filter(|old| **old != record.id) {
                    self.remove_superseded(old);
                }
            }
            Persisted::Updated => {
                tracing::debug!("Updated {} ({}); after-save hooks skipped", record.id, record.model);
            }
        }

        Ok(true)
    }

    /// Delete a record by id.
    ///
    /// Returns `Ok(false)` if the record does not exist or a `before_delete`
    /// hook stopped the delete.
    pub fn delete(&self, id: &FileId) -> Result<bool> {
        // The row may not be queryable once deleted, so hooks get this snapshot
        let Some(snapshot) = self.store.get(id)? else {
            tracing::debug!("Delete of {} skipped: no such record", id);
            return Ok(false);
        };

        let adapter = self.adapters.adapter_for(&snapshot.adapter)?;
        let ctx = HookContext {
            record: &snapshot,
            adapter: adapter.as_ref(),
        };

        if let Some(hook) = self.first_stop(|hook| hook.before_delete(&ctx)) {
            tracing::info!("Delete of {} ({}) stopped by hook '{}'", id, snapshot.model, hook);
            return Ok(false);
        }

        let deleted = self.store.delete(id)?;
        if !deleted {
            tracing::warn!("Record {} disappeared before it could be deleted", id);
        }

        for hook in &self.hooks {
            hook.after_delete(&ctx);
        }
        tracing::info!("Deleted {} ({}) from adapter {}", id, snapshot.model, snapshot.adapter);

        Ok(deleted)
    }

    /// Run a before-phase; returns the name of the hook that stopped it.
    fn first_stop<F>(&self, mut phase: F) -> Option<&str>
    where
        F: FnMut(&dyn LifecycleHook) -> HookOutcome,
    {
        for hook in &self.hooks {
            if phase(hook.as_ref()).is_stop() {
                return Some(hook.name());
            }
        }
        None
    }

    fn remove_superseded(&self, old: &FileId) {
        match self.delete(old) {
            Ok(true) => tracing::info!("Removed superseded record {}", old),
            Ok(false) => tracing::debug!("Superseded record {} was not removed", old),
            Err(e) => tracing::warn!("Failed to remove superseded record {}: {}", old, e),
        }
    }
}

impl std::fmt::Debug for LifecycleCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleCoordinator")
            .field("adapters", &self.adapters)
            .field("hooks", &self.hook_names())
            .finish()
    }
}
