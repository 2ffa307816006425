//! Core data structures for apx.
//!
//! This module contains the foundational types used throughout apx:
//! - Overlay identity (module paths, languages, overlay descriptors)
//! - Lock file records
//! - Workspace layout and discovery

pub mod lockfile;
pub mod overlay;
pub mod workspace;

pub use lockfile::{DependencyLock, LockFile, ToolchainLock, LOCKFILE_NAME, LOCKFILE_VERSION};
pub use overlay::{Language, ModulePath, Overlay};
pub use workspace::{find_config, Workspace};
