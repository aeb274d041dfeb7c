//! Lifecycle hook trait and the context handed to hooks.

use filevault_common::StoredFileRecord;

use crate::storage::StorageAdapter;

/// Whether a before-phase hook lets the operation proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    /// Abort the operation; remaining hooks are skipped.
    Stop,
}

impl HookOutcome {
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

/// What every lifecycle notification carries.
#[derive(Clone, Copy)]
pub struct HookContext<'a> {
    /// The record being saved, or the snapshot of the record being deleted.
    pub record: &'a StoredFileRecord,
    /// The adapter named by the record's `adapter` tag.
    pub adapter: &'a dyn StorageAdapter,
}

impl std::fmt::Debug for HookContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookContext")
            .field("record", self.record)
            .field("adapter", &self.adapter.name())
            .finish()
    }
}

/// A consumer of save/delete notifications.
///
/// All methods default to no-ops so hooks only implement the phases they
/// care about. Hooks run synchronously in registration order.
pub trait LifecycleHook: Send + Sync {
    /// A short, human-readable name used in logs.
    fn name(&self) -> &str;

    /// Called before a record is persisted. `Stop` aborts the save.
    fn before_save(&self, _ctx: &HookContext<'_>) -> HookOutcome {
        HookOutcome::Continue
    }

    /// Called after a newly created record was persisted. Never called for
    /// updates.
    fn after_save(&self, _ctx: &HookContext<'_>) {}

    /// Called with a snapshot before a record is deleted. `Stop` aborts the
    /// delete.
    fn before_delete(&self, _ctx: &HookContext<'_>) -> HookOutcome {
        HookOutcome::Continue
    }

    /// Called with the pre-delete snapshot after the record was deleted.
    fn after_delete(&self, _ctx: &HookContext<'_>) {}
}
