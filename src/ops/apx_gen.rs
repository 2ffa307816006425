//! Implementation of `apx gen`.
//!
//! Creates an overlay directory for every locked dependency so a code
//! generator has somewhere to write. The generator itself runs outside apx.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{Language, Overlay, Workspace};
use crate::ops::lockfile::LockStore;
use crate::overlay::SyncReport;

/// Options for `apx gen`.
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Target language
    pub language: Language,
}

/// Result of preparing overlays.
#[derive(Debug, Clone, Serialize)]
pub struct GenResult {
    /// Overlays created or confirmed, sorted by module path
    pub overlays: Vec<Overlay>,

    /// Present when the language is the host language and the manifest was rewritten
    pub sync: Option<SyncReport>,
}

/// Create overlays for all locked dependencies in `opts.language`.
///
/// The manifest is resynced only for the host language, since only those
/// overlays appear in it.
pub fn gen_overlays(ws: &Workspace, opts: &GenOptions) -> Result<GenResult> {
    let deps = LockStore::new(ws.lockfile_path())
        .list()
        .context("failed to list dependencies")?;

    if deps.is_empty() {
        return Ok(GenResult {
            overlays: Vec::new(),
            sync: None,
        });
    }

    let store = ws.overlay_store();
    let mut overlays = Vec::with_capacity(deps.len());
    for (module_path, _) in &deps {
        let overlay = store
            .create(module_path, &opts.language)
            .with_context(|| format!("failed to create overlay for {}", module_path))?;
        overlays.push(overlay);
    }

    let synchronizer = ws.synchronizer();
    let sync = if opts.language == synchronizer.host().language {
        Some(synchronizer.sync().context("failed to sync workspace manifest")?)
    } else {
        None
    };

    Ok(GenResult { overlays, sync })
}
