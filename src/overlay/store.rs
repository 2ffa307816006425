//! Filesystem-backed overlay store.
//!
//! The store owns the generated-code root (`internal/gen` by default) and
//! everything beneath it. Layout:
//!
//! ```text
//! <gen-root>/<language>/<module-path...>/   leaf directory = overlay
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{Language, ModulePath, Overlay};
use crate::overlay::classify;
use crate::overlay::error::{OverlayError, Result};
use crate::util::config::CONFIG_NAME;

/// Creates, enumerates and deletes overlay directories.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    root: PathBuf,
    workspace_root: Option<PathBuf>,
}

impl OverlayStore {
    /// Create a store rooted at the given generated-code directory.
    ///
    /// The directory does not need to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OverlayStore {
            root: root.into(),
            workspace_root: None,
        }
    }

    /// Record the workspace the store lives in. [`clean_all`](Self::clean_all)
    /// refuses to delete a root that is, or contains, this directory.
    pub fn with_workspace_root(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(workspace_root.into());
        self
    }

    /// The generated-code root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory an overlay for `(module_path, language)` lives in.
    pub fn overlay_dir(&self, module_path: &ModulePath, language: &Language) -> PathBuf {
        module_path.join_onto(&self.root.join(language.as_str()))
    }

    /// Ensure the overlay directory exists, creating all parents.
    ///
    /// Calling this again for the same pair is a no-op that returns an equal
    /// descriptor. File contents are never looked at.
    pub fn create(&self, module_path: &ModulePath, language: &Language) -> Result<Overlay> {
        let location = self.overlay_dir(module_path, language);

        fs::create_dir_all(&location)
            .map_err(|e| OverlayError::io("create overlay directory", &location, e))?;

        tracing::debug!("overlay ready at {}", location.display());

        Ok(Overlay {
            module_path: module_path.clone(),
            language: language.clone(),
            location,
        })
    }

    /// All overlays across every language directory.
    ///
    /// Enumeration order is an implementation detail; sort before showing
    /// the result to anyone.
    pub fn list(&self) -> Result<Vec<Overlay>> {
        classify::classify_all(&self.root)
    }

    /// Overlays for a single language.
    pub fn list_language(&self, language: &Language) -> Result<Vec<Overlay>> {
        classify::classify_language(&self.root, language)
    }

    /// Delete the overlay for `module_path` in every language where it
    /// currently classifies as one.
    ///
    /// Returns the removed overlays. When no language has an overlay for the
    /// path, [`OverlayError::NotFound`] is returned and nothing is touched.
    /// Intermediate directories left empty by the removal are pruned so they
    /// do not turn into overlays themselves.
    pub fn remove(&self, module_path: &ModulePath) -> Result<Vec<Overlay>> {
        let matching: Vec<Overlay> = self
            .list()?
            .into_iter()
            .filter(|o| &o.module_path == module_path)
            .collect();

        if matching.is_empty() {
            return Err(OverlayError::NotFound {
                module_path: module_path.to_string(),
            });
        }

        for overlay in &matching {
            match fs::remove_dir_all(&overlay.location) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(OverlayError::io("remove overlay", &overlay.location, e)),
            }
            tracing::debug!("removed overlay {}", overlay.location.display());

            self.prune_empty_parents(&overlay.location, &overlay.language)?;
        }

        Ok(matching)
    }

    /// Delete the whole generated-code root.
    ///
    /// Returns whether anything was there to delete. Fails with
    /// [`OverlayError::UnsafeClean`] without deleting anything when the root
    /// is the workspace itself or holds the project configuration.
    pub fn clean_all(&self) -> Result<bool> {
        self.check_clean_target()?;

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                tracing::debug!("removed {}", self.root.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(OverlayError::io("remove", &self.root, e)),
        }
    }

    fn check_clean_target(&self) -> Result<()> {
        let refuse = |reason: &str| OverlayError::UnsafeClean {
            path: self.root.clone(),
            reason: reason.to_string(),
        };

        if self.root.components().next().is_none() {
            return Err(refuse("generated-code root is empty"));
        }
        if let Some(ws) = &self.workspace_root {
            if ws.starts_with(&self.root) {
                return Err(refuse("it is the workspace root or one of its parents"));
            }
        }
        if self.root.join(CONFIG_NAME).exists() {
            return Err(refuse("it contains the project configuration"));
        }
        Ok(())
    }

    /// Remove now-empty ancestors of `removed`, stopping at the language
    /// directory.
    fn prune_empty_parents(&self, removed: &Path, language: &Language) -> Result<()> {
        let lang_dir = self.root.join(language.as_str());
        let mut current = removed.parent();

        while let Some(dir) = current {
            if dir == lang_dir || !dir.starts_with(&lang_dir) {
                break;
            }

            let is_empty = match fs::read_dir(dir) {
                Ok(mut entries) => entries.next().is_none(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => true,
                Err(e) => return Err(OverlayError::io("read directory", dir, e)),
            };
            if !is_empty {
                break;
            }

            match fs::remove_dir(dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(OverlayError::io("remove", dir, e)),
            }
            current = dir.parent();
        }

        Ok(())
    }
}
