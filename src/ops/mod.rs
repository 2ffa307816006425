//! High-level operations.
//!
//! This module contains the implementation of apx commands.

pub mod apx_add;
pub mod apx_gen;
pub mod apx_sync;
pub mod apx_unlink;
pub mod lockfile;

pub use apx_add::{add_dependency, AddOptions, AddResult};
pub use apx_gen::{gen_overlays, GenOptions, GenResult};
pub use apx_sync::{clean, list_overlays, sync, SyncOptions, SyncOutcome};
pub use apx_unlink::{unlink, UnlinkResult};
pub use lockfile::LockStore;
