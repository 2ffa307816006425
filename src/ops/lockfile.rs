//! Lockfile I/O operations.
//!
//! [`LockStore`] reads and writes `apx.lock`. The overlay engine never writes
//! through it; only `add` and `unlink` do.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::{DependencyLock, LockFile, ModulePath};
use crate::util::fs;

/// Handle on the `apx.lock` file of a workspace.
#[derive(Debug, Clone)]
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LockStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the lock file; a missing file is an empty lock.
    pub fn load(&self) -> Result<LockFile> {
        if !self.path.exists() {
            return Ok(LockFile::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(LockFile::new());
        }

        let lockfile: LockFile = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse lockfile: {}", self.path.display()))?;

        if !lockfile.is_compatible() {
            bail!(
                "lockfile version {} is not compatible with this version of apx",
                lockfile.version
            );
        }

        Ok(lockfile)
    }

    /// Write the lock file.
    pub fn save(&self, lockfile: &LockFile) -> Result<()> {
        let contents = serde_yaml::to_string(lockfile).context("failed to serialize lockfile")?;
        fs::write_string(&self.path, &contents)
    }

    /// Insert or replace the pin for `module_path`.
    pub fn add(&self, module_path: &ModulePath, source_ref: &str, source_repo: &str) -> Result<DependencyLock> {
        let mut lockfile = self.load()?;

        let lock = DependencyLock {
            source_repo: source_repo.to_string(),
            source_ref: source_ref.to_string(),
            member_modules: vec![module_path.clone()],
        };
        lockfile.dependencies.insert(module_path.clone(), lock.clone());

        self.save(&lockfile)?;
        Ok(lock)
    }

    /// Remove the pin for `module_path`.
    ///
    /// Fails without touching the file when there is no such dependency.
    pub fn remove(&self, module_path: &ModulePath) -> Result<DependencyLock> {
        let mut lockfile = self.load()?;

        let Some(removed) = lockfile.dependencies.remove(module_path) else {
            bail!("dependency not found: {}", module_path);
        };

        self.save(&lockfile)?;
        Ok(removed)
    }

    /// All pinned dependencies, sorted by module path.
    pub fn list(&self) -> Result<Vec<(ModulePath, DependencyLock)>> {
        Ok(self.load()?.dependencies.into_iter().collect())
    }

    pub fn contains(&self, module_path: &ModulePath) -> Result<bool> {
        Ok(self.load()?.dependencies.contains_key(module_path))
    }
}
