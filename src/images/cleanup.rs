//! Removal of derived image variants after a record is deleted.

use std::sync::Arc;

use crate::lifecycle::{HookContext, LifecycleHook};

use super::resolver::{Resolution, ResolveOptions, VersionResolver};

/// After-delete hook that removes every resolvable version of the deleted
/// record from the record's adapter.
///
/// Versions resolved outside the adapter (URLs, protocol-relative or
/// absolute paths) are left alone. Failures are logged per variant and do
/// not stop the remaining removals.
pub struct VariantCleanupHook {
    resolver: Arc<VersionResolver>,
    options: ResolveOptions,
}

impl VariantCleanupHook {
    pub fn new(resolver: Arc<VersionResolver>) -> Self {
        Self {
            resolver,
            options: ResolveOptions::default(),
        }
    }

    /// Options used when resolving the versions to remove.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }
}

impl LifecycleHook for VariantCleanupHook {
    fn name(&self) -> &str {
        "variant-cleanup"
    }

    fn after_delete(&self, ctx: &HookContext<'_>) {
        let versions = match self.resolver.resolve_all(ctx.record, &self.options) {
            Ok(versions) => versions,
            Err(e) => {
                tracing::warn!("Cannot resolve versions of {} for cleanup: {}", ctx.record.id, e);
                return;
            }
        };

        let mut removed = 0usize;
        for (label, resolution) in versions {
            let Resolution::Resolved(path) = resolution else {
                continue;
            };
            if is_external(&path) {
                tracing::debug!("Skipping external {} variant at {}", label, path);
                continue;
            }
            match ctx.adapter.delete(&path) {
                Ok(true) => removed += 1,
                Ok(false) => tracing::trace!("No {} variant stored at {}", label, path),
                Err(e) => tracing::warn!("Failed to remove {} variant {}: {}", label, path, e),
            }
        }

        tracing::debug!(
            "Removed {} variant(s) of {} ({})",
            removed,
            ctx.record.id,
            ctx.record.model
        );
    }
}

/// Whether a resolved path points outside the adapter's key space.
fn is_external(path: &str) -> bool {
    path.contains("://") || path.starts_with('/')
}
