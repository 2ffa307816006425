//! Workspace - central configuration hub.
//!
//! A Workspace is the project directory that holds `apx.yaml`, `apx.lock`,
//! the generated-code root and the workspace manifest. It hands out the
//! overlay store and manifest synchronizer wired to those paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::lockfile::LOCKFILE_NAME;
use crate::overlay::{ManifestSynchronizer, OverlayStore};
use crate::util::config::{Config, CONFIG_NAME};

/// A project workspace and its configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Find the workspace containing `cwd`.
    ///
    /// Searches upward for `apx.yaml`. Without one, `cwd` itself is the
    /// workspace root and defaults apply.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let cwd = cwd
            .canonicalize()
            .with_context(|| format!("failed to resolve directory: {}", cwd.display()))?;

        match find_config(&cwd) {
            Some(config_path) => {
                let root = config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                tracing::debug!("workspace root: {}", root.display());
                Self::at(&root)
            }
            None => {
                tracing::debug!(
                    "no {} found above {}, using it as workspace root",
                    CONFIG_NAME,
                    cwd.display()
                );
                Self::at(&cwd)
            }
        }
    }

    /// Open the workspace rooted exactly at `root`.
    pub fn at(root: &Path) -> Result<Self> {
        let config = Config::load_or_default(&root.join(CONFIG_NAME))?;
        Ok(Workspace {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the `apx.yaml` path (which may not exist).
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_NAME)
    }

    /// Get the lockfile path.
    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_NAME)
    }

    /// Get the generated-code root.
    pub fn gen_dir(&self) -> PathBuf {
        self.root.join(&self.config.overlay.gen_dir)
    }

    /// Get the workspace manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.overlay.manifest_file)
    }

    pub fn overlay_store(&self) -> OverlayStore {
        OverlayStore::new(self.gen_dir()).with_workspace_root(&self.root)
    }

    pub fn synchronizer(&self) -> ManifestSynchronizer {
        ManifestSynchronizer::new(
            self.root.clone(),
            self.overlay_store(),
            self.config.overlay.host_build(),
        )
    }
}

/// Find `apx.yaml` starting from `start` and searching upward.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_walks_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_NAME), "org: acme\nrepo: apis\n").unwrap();
        let nested = tmp.path().join("internal/service");
        std::fs::create_dir_all(&nested).unwrap();

        let ws = Workspace::discover(&nested).unwrap();
        assert_eq!(ws.root(), tmp.path().canonicalize().unwrap());
        assert_eq!(ws.config().canonical_repo(), "github.com/acme/apis");
    }

    #[test]
    fn test_discover_without_config_uses_cwd() {
        let tmp = TempDir::new().unwrap();

        let ws = Workspace::discover(tmp.path()).unwrap();
        assert_eq!(ws.root(), tmp.path().canonicalize().unwrap());
        assert!(ws.gen_dir().ends_with("internal/gen"));
        assert!(ws.manifest_path().ends_with("go.work"));
        assert!(ws.lockfile_path().ends_with("apx.lock"));
    }

    #[test]
    fn test_configured_layout() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_NAME),
            "overlay:\n  gen_dir: gen\n  manifest_file: dev.work\n",
        )
        .unwrap();

        let ws = Workspace::at(tmp.path()).unwrap();
        assert_eq!(ws.gen_dir(), tmp.path().join("gen"));
        assert_eq!(ws.overlay_store().root(), tmp.path().join("gen"));
        assert_eq!(ws.synchronizer().manifest_path(), tmp.path().join("dev.work"));
    }
}
