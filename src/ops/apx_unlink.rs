//! Implementation of `apx unlink`.
//!
//! Moves a module from its local overlay to the published artifact:
//!
//! 1. drop the lock entry (missing entry aborts before anything changes)
//! 2. delete the overlay in every language
//! 3. resync the workspace manifest
//!
//! Each step that fails after an earlier one succeeded says so in the error,
//! so a partial unlink is never reported as success.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{DependencyLock, ModulePath, Overlay, Workspace};
use crate::ops::lockfile::LockStore;
use crate::overlay::{OverlayError, SyncReport};

/// Result of unlinking a module.
#[derive(Debug, Clone, Serialize)]
pub struct UnlinkResult {
    pub module_path: ModulePath,

    /// The lock entry that was removed
    pub lock: DependencyLock,

    /// Overlay directories that were deleted
    pub removed: Vec<Overlay>,

    /// The manifest after resync
    pub sync: SyncReport,
}

impl UnlinkResult {
    /// No overlay existed on disk for the module.
    pub fn had_no_overlay(&self) -> bool {
        self.removed.is_empty()
    }

    /// Command that pulls in the published Go module.
    pub fn published_hint(&self) -> String {
        format!(
            "go get {}-go/{}@{}",
            self.lock.source_repo, self.module_path, self.lock.source_ref
        )
    }
}

/// Remove the lock entry and overlays for `module_path`, then resync.
pub fn unlink(ws: &Workspace, module_path: &ModulePath) -> Result<UnlinkResult> {
    let lock_store = LockStore::new(ws.lockfile_path());
    let lock = lock_store.remove(module_path)?;
    tracing::debug!("removed {} from {}", module_path, lock_store.path().display());

    let removed = match ws.overlay_store().remove(module_path) {
        Ok(removed) => removed,
        Err(OverlayError::NotFound { .. }) => {
            tracing::debug!("no overlay on disk for {}", module_path);
            Vec::new()
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "removed {} from apx.lock but failed to delete its overlay; \
                     run `apx sync --clean` to reset generated code",
                    module_path
                )
            })
        }
    };

    let sync = ws.synchronizer().sync().with_context(|| {
        format!(
            "removed overlay for {} but the workspace manifest is stale; run `apx sync`",
            module_path
        )
    })?;

    Ok(UnlinkResult {
        module_path: module_path.clone(),
        lock,
        removed,
        sync,
    })
}
