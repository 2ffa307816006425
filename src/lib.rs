//! apx - canonical import paths backed by local generated code
//!
//! This crate provides the overlay synchronization engine behind `apx`:
//! overlay directories for generated code, their classification, and the
//! workspace manifest that makes canonical imports resolve to them.

pub mod core;
pub mod ops;
pub mod overlay;
pub mod util;

pub use core::{
    lockfile::{DependencyLock, LockFile},
    overlay::{Language, ModulePath, Overlay},
    workspace::Workspace,
};

pub use overlay::{HostBuild, ManifestSynchronizer, OverlayError, OverlayStore, SyncReport};
