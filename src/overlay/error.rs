//! Overlay engine errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for overlay engine operations.
pub type Result<T, E = OverlayError> = std::result::Result<T, E>;

/// Errors produced by the overlay store and manifest synchronizer.
///
/// Manifest write failures are kept apart from other filesystem failures so
/// callers can tell "overlays changed but the manifest is stale" from
/// "nothing changed".
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("invalid module path `{path}`: {reason}")]
    InvalidModulePath { path: String, reason: String },

    #[error("invalid language `{name}`: expected a lower-case identifier such as `go` or `python`")]
    InvalidLanguage { name: String },

    #[error("overlay not found: {module_path}")]
    NotFound { module_path: String },

    #[error("failed to {op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to delete {}: {reason}", path.display())]
    UnsafeClean { path: PathBuf, reason: String },

    #[error("failed to write workspace manifest {}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OverlayError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        OverlayError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Whether this is the "nothing to remove" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OverlayError::NotFound { .. })
    }

    /// Whether the manifest could not be written.
    pub fn is_manifest_write(&self) -> bool {
        matches!(self, OverlayError::ManifestWrite { .. })
    }

    /// The filesystem path involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            OverlayError::Io { path, .. }
            | OverlayError::ManifestWrite { path, .. }
            | OverlayError::UnsafeClean { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for OverlayError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
        OverlayError::io("walk", path, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_path() {
        let err = OverlayError::io(
            "remove",
            "/ws/internal/gen/go/a",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to remove /ws/internal/gen/go/a");
        assert_eq!(err.path(), Some(std::path::Path::new("/ws/internal/gen/go/a")));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_kinds() {
        let not_found = OverlayError::NotFound {
            module_path: "x/y".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "overlay not found: x/y");

        let write = OverlayError::ManifestWrite {
            path: PathBuf::from("go.work"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(write.is_manifest_write());
    }
}
