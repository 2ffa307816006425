//! The overlay synchronization engine.
//!
//! Overlays let a project import canonical module paths while resolving them
//! to freshly generated code on disk:
//!
//! 1. A generation step calls [`OverlayStore::create`] and writes code into
//!    the returned directory.
//! 2. [`ManifestSynchronizer::sync`] rewrites the workspace manifest
//!    (`go.work`) so canonical imports resolve to those directories.
//! 3. When the project moves to the published module,
//!    [`OverlayStore::remove`] deletes every language variant and another
//!    sync drops the manifest entry. Imports do not change.
//!
//! Only host-language overlays appear in the manifest; other languages are
//! resolved through their own mechanisms.
//!
//! Nothing here takes a lock. One invocation per workspace at a time.

pub mod classify;
pub mod error;
pub mod store;
pub mod sync;

pub use error::{OverlayError, Result};
pub use store::OverlayStore;
pub use sync::{render_manifest, HostBuild, ManifestSynchronizer, SyncReport};
