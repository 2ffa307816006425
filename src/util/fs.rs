//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a relative path with `/` separators on every platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `path` names a directory strictly below its base: relative, no
/// `..`, and at least one real component (`.` alone is the base itself).
pub fn is_contained_relative(path: &Path) -> bool {
    let mut normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");

        write_string(&path, "content").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_relative_path_and_slash() {
        let base = Path::new("/ws");
        let path = Path::new("/ws/internal/gen/go/a");
        let rel = relative_path(base, path);
        assert_eq!(to_slash(&rel), "internal/gen/go/a");
    }

    #[test]
    fn test_is_contained_relative() {
        assert!(is_contained_relative(Path::new("internal/gen")));
        assert!(is_contained_relative(Path::new("./gen")));
        assert!(!is_contained_relative(Path::new("../gen")));
        assert!(!is_contained_relative(Path::new("/abs/gen")));
        assert!(!is_contained_relative(Path::new("")));
        assert!(!is_contained_relative(Path::new(".")));
        assert!(!is_contained_relative(Path::new("./")));
        assert!(!is_contained_relative(Path::new("./.")));
    }
}
