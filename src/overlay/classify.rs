//! Overlay directory classification.
//!
//! Beneath `<gen-root>/<language>` every directory is either an overlay or an
//! intermediate path segment. The rule is structural: a directory with no
//! subdirectories is an overlay, anything else is a segment.
//!
//! Known limitation: the rule cannot tell a module whose generated output is
//! still empty from an intermediate segment that has not received children
//! yet, and a module that generates its own subdirectories (per-version
//! folders, for example) is classified as a segment. Generators must write a
//! flat directory per module.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::core::{Language, ModulePath, Overlay};
use crate::overlay::error::{OverlayError, Result};

/// Classify every directory under `root/language` and return the overlays.
///
/// A missing root or language directory yields an empty set. Symbolic links
/// are never followed and never count as subdirectories, the language
/// directory itself included, so an overlay can only live inside the
/// generated-code root. Leaves whose relative path is not a valid module
/// path are skipped with a warning.
pub fn classify_language(root: &Path, language: &Language) -> Result<Vec<Overlay>> {
    let lang_dir = root.join(language.as_str());
    match fs::symlink_metadata(&lang_dir) {
        Ok(meta) if meta.file_type().is_dir() => {}
        Ok(meta) => {
            if meta.file_type().is_symlink() {
                tracing::warn!("skipping {}: symbolic link", lang_dir.display());
            }
            return Ok(Vec::new());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(OverlayError::io("inspect", &lang_dir, e)),
    }

    let mut overlays = Vec::new();

    for entry in WalkDir::new(&lang_dir)
        .min_depth(1)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        if has_subdirectories(entry.path())? {
            continue;
        }

        let module_path = match relative_module_path(&lang_dir, entry.path()) {
            Ok(module_path) => module_path,
            Err(e) => {
                tracing::warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        tracing::debug!("classified overlay {}:{}", language, module_path);

        overlays.push(Overlay {
            module_path,
            language: language.clone(),
            location: entry.into_path(),
        });
    }

    Ok(overlays)
}

/// Classify every language directory under `root`.
///
/// Languages are scanned independently; the same module path may be an
/// overlay in one language and a segment in another.
pub fn classify_all(root: &Path) -> Result<Vec<Overlay>> {
    let mut overlays = Vec::new();
    for language in language_dirs(root)? {
        overlays.extend(classify_language(root, &language)?);
    }
    Ok(overlays)
}

/// List the language subdirectories of `root`, sorted.
///
/// Entries whose names are not valid language identifiers are skipped with a
/// warning rather than failing the whole scan.
pub fn language_dirs(root: &Path) -> Result<Vec<Language>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(OverlayError::io("read directory", root, e)),
    };

    let mut languages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| OverlayError::io("read directory", root, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| OverlayError::io("inspect", entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        match Language::new(name) {
            Ok(language) => languages.push(language),
            Err(e) => tracing::warn!("skipping {}: {}", entry.path().display(), e),
        }
    }

    languages.sort();
    Ok(languages)
}

/// Whether `dir` has at least one real (non-symlink) subdirectory.
fn has_subdirectories(dir: &Path) -> Result<bool> {
    let entries = fs::read_dir(dir).map_err(|e| OverlayError::io("read directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| OverlayError::io("read directory", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| OverlayError::io("inspect", entry.path(), e))?;
        if file_type.is_dir() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Path of `dir` relative to `lang_dir`, `/`-joined regardless of platform.
fn relative_module_path(lang_dir: &Path, dir: &Path) -> Result<ModulePath> {
    let rel = dir.strip_prefix(lang_dir).map_err(|_| OverlayError::InvalidModulePath {
        path: dir.display().to_string(),
        reason: format!("not inside {}", lang_dir.display()),
    })?;

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    ModulePath::new(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(overlays: &[Overlay]) -> Vec<&str> {
        overlays.iter().map(|o| o.module_path.as_str()).collect()
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("does-not-exist");

        assert!(classify_language(&root, &Language::go()).unwrap().is_empty());
        assert!(classify_all(&root).unwrap().is_empty());
    }

    #[test]
    fn test_leaf_rule() {
        let tmp = TempDir::new().unwrap();
        let go = tmp.path().join("go");
        fs::create_dir_all(go.join("a/b")).unwrap();
        fs::create_dir_all(go.join("a/c/d")).unwrap();

        let overlays = classify_language(tmp.path(), &Language::go()).unwrap();
        assert_eq!(paths(&overlays), vec!["a/b", "a/c/d"]);
        assert_eq!(overlays[0].location, go.join("a").join("b"));
    }

    #[test]
    fn test_files_do_not_make_segments() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("go/proto/ledger/v1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ledger.pb.go"), "package ledgerv1").unwrap();
        fs::write(tmp.path().join("go/proto/README"), "segments may hold files").unwrap();

        let overlays = classify_language(tmp.path(), &Language::go()).unwrap();
        assert_eq!(paths(&overlays), vec!["proto/ledger/v1"]);
    }

    #[test]
    fn test_nested_generated_output_is_a_segment() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("go/proto/ledger@v1.2.3/v1")).unwrap();

        let overlays = classify_language(tmp.path(), &Language::go()).unwrap();
        assert_eq!(paths(&overlays), vec!["proto/ledger@v1.2.3/v1"]);
    }

    #[test]
    fn test_languages_are_independent() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("go/x/y")).unwrap();
        fs::create_dir_all(tmp.path().join("python/x/y/z")).unwrap();

        let all = classify_all(tmp.path()).unwrap();
        let go: Vec<_> = all.iter().filter(|o| o.language.as_str() == "go").collect();
        let py: Vec<_> = all.iter().filter(|o| o.language.as_str() == "python").collect();

        assert_eq!(go.len(), 1);
        assert_eq!(go[0].module_path.as_str(), "x/y");
        assert_eq!(py.len(), 1);
        assert_eq!(py[0].module_path.as_str(), "x/y/z");
    }

    #[test]
    fn test_language_dirs_skip_files_and_invalid_names() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("python")).unwrap();
        fs::create_dir_all(tmp.path().join("go")).unwrap();
        fs::create_dir_all(tmp.path().join("Not A Language")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();

        let langs = language_dirs(tmp.path()).unwrap();
        let names: Vec<_> = langs.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["go", "python"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("outside/deep");
        fs::create_dir_all(&outside).unwrap();

        let gen_root = tmp.path().join("gen");
        fs::create_dir_all(gen_root.join("go/a")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("outside"), gen_root.join("go/a/link")).unwrap();

        let overlays = classify_language(&gen_root, &Language::go()).unwrap();
        assert_eq!(paths(&overlays), vec!["a"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_language_dir_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("outside/evil/v1")).unwrap();

        let gen_root = tmp.path().join("gen");
        fs::create_dir_all(gen_root.join("python/a")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("outside"), gen_root.join("go")).unwrap();

        assert!(classify_language(&gen_root, &Language::go()).unwrap().is_empty());

        let all = classify_all(&gen_root).unwrap();
        assert_eq!(paths(&all), vec!["a"]);
        assert_eq!(all[0].language.as_str(), "python");
    }

    #[test]
    fn test_invalid_leaf_names_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("go/proto/a/v1")).unwrap();
        fs::create_dir_all(tmp.path().join("go/proto/b/my module")).unwrap();
        fs::create_dir_all(tmp.path().join("java/proto/a/Foo$1")).unwrap();

        let go = classify_language(tmp.path(), &Language::go()).unwrap();
        assert_eq!(paths(&go), vec!["proto/a/v1"]);

        let all = classify_all(tmp.path()).unwrap();
        assert_eq!(paths(&all), vec!["proto/a/v1"]);
    }
}
