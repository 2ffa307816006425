//! Workspace manifest synchronization.
//!
//! The manifest (`go.work` by default) is a pure function of the host build
//! declaration and the host-language overlays currently on disk. It is
//! regenerated wholesale on every sync; the previous contents are never
//! parsed or patched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::Language;
use crate::overlay::error::{OverlayError, Result};
use crate::overlay::store::OverlayStore;
use crate::util::fs::to_slash;

/// How the host build system's workspace manifest looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBuild {
    /// Language whose overlays are listed in the manifest
    pub language: Language,

    /// Manifest file name, relative to the workspace root
    pub manifest_file: String,

    /// First line of the manifest (e.g. `go 1.24`)
    pub directive: String,
}

impl Default for HostBuild {
    fn default() -> Self {
        HostBuild {
            language: Language::go(),
            manifest_file: "go.work".to_string(),
            directive: "go 1.24".to_string(),
        }
    }
}

/// Outcome of a sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Manifest that was written
    pub manifest_path: PathBuf,

    /// Overlay entries, in emitted order, without the root module entry
    pub entries: Vec<String>,

    /// Whether the written content differs from what was there before
    pub changed: bool,
}

/// Regenerates the workspace manifest from the overlay store.
#[derive(Debug, Clone)]
pub struct ManifestSynchronizer {
    workspace_root: PathBuf,
    store: OverlayStore,
    host: HostBuild,
}

impl ManifestSynchronizer {
    pub fn new(workspace_root: impl Into<PathBuf>, store: OverlayStore, host: HostBuild) -> Self {
        ManifestSynchronizer {
            workspace_root: workspace_root.into(),
            store,
            host,
        }
    }

    /// Absolute path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.workspace_root.join(&self.host.manifest_file)
    }

    pub fn host(&self) -> &HostBuild {
        &self.host
    }

    /// Relative `./`-prefixed entries for every host-language overlay,
    /// sorted so the output never depends on directory read order.
    pub fn entries(&self) -> Result<Vec<String>> {
        let mut entries: Vec<String> = self
            .store
            .list_language(&self.host.language)?
            .iter()
            .map(|overlay| self.entry_for(&overlay.location))
            .collect();

        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    /// Render the manifest content from current on-disk state.
    pub fn render(&self) -> Result<String> {
        Ok(render_manifest(&self.host.directive, &self.entries()?))
    }

    /// Rewrite the manifest.
    ///
    /// Two syncs with no overlay changes in between produce byte-identical
    /// files. The write is not atomic; an interrupted sync is repaired by the
    /// next successful one.
    pub fn sync(&self) -> Result<SyncReport> {
        let entries = self.entries()?;
        let content = render_manifest(&self.host.directive, &entries);
        let manifest_path = self.manifest_path();

        let changed = match fs::read_to_string(&manifest_path) {
            Ok(previous) => previous != content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::debug!(
                    "could not read previous {}: {}",
                    manifest_path.display(),
                    e
                );
                true
            }
        };

        fs::write(&manifest_path, &content).map_err(|source| OverlayError::ManifestWrite {
            path: manifest_path.clone(),
            source,
        })?;

        tracing::debug!(
            "wrote {} with {} overlay entries",
            manifest_path.display(),
            entries.len()
        );

        Ok(SyncReport {
            manifest_path,
            entries,
            changed,
        })
    }

    fn entry_for(&self, location: &Path) -> String {
        let rel = crate::util::fs::relative_path(&self.workspace_root, location);
        format!("./{}", to_slash(&rel))
    }
}

/// Render manifest text for the given directive and sorted entries.
pub fn render_manifest(directive: &str, entries: &[String]) -> String {
    let mut content = String::new();
    content.push_str(directive);
    content.push_str("\n\nuse (\n\t.\n");
    for entry in entries {
        content.push('\t');
        content.push_str(entry);
        content.push('\n');
    }
    content.push_str(")\n");
    content
}
