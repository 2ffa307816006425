//! Lock file records.
//!
//! `apx.lock` pins every canonical module the project depends on to a source
//! repository and ref. It belongs to the dependency-management commands; the
//! overlay engine only reads it to decide which overlays to create.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::overlay::ModulePath;

/// Current lock file format version.
pub const LOCKFILE_VERSION: u32 = 1;

/// Lock file name at the workspace root.
pub const LOCKFILE_NAME: &str = "apx.lock";

/// Serialized form of `apx.lock`.
///
/// Maps are ordered so that saving the same content twice produces the same
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    /// Lock file format version
    pub version: u32,

    /// Pinned tool versions, carried through untouched
    #[serde(default)]
    pub toolchains: BTreeMap<String, ToolchainLock>,

    /// Pinned dependencies keyed by canonical module path
    #[serde(default)]
    pub dependencies: BTreeMap<ModulePath, DependencyLock>,
}

impl LockFile {
    /// An empty lock file at the current format version.
    pub fn new() -> Self {
        LockFile {
            version: LOCKFILE_VERSION,
            toolchains: BTreeMap::new(),
            dependencies: BTreeMap::new(),
        }
    }

    /// Whether this binary understands the file's format version.
    pub fn is_compatible(&self) -> bool {
        self.version <= LOCKFILE_VERSION
    }
}

impl Default for LockFile {
    fn default() -> Self {
        Self::new()
    }
}

/// A pinned source reference for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLock {
    /// Canonical source repository (e.g. `github.com/acme/apis`)
    #[serde(rename = "repo")]
    pub source_repo: String,

    /// Tag, version or `latest`
    #[serde(rename = "ref")]
    pub source_ref: String,

    /// Module paths provided by this dependency
    #[serde(rename = "modules", default)]
    pub member_modules: Vec<ModulePath>,
}

/// A pinned toolchain version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainLock {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}
