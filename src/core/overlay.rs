//! Overlay identity types.
//!
//! An overlay is a generated-code directory standing in for a canonical
//! module path during local development. Overlays are never persisted on
//! their own; they are derived from what is on disk under the generated-code
//! root.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::overlay::error::OverlayError;

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._@+~-]+$").expect("valid segment regex"));

static LANGUAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_+-]*$").expect("valid language regex"));

/// Canonical, slash-separated module path (e.g. `proto/payments/ledger/v1`).
///
/// Validation guarantees the path is relative and cannot climb out of the
/// directory it is joined onto.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModulePath(String);

impl ModulePath {
    /// Parse and validate a module path.
    pub fn new(path: impl Into<String>) -> Result<Self, OverlayError> {
        let path = path.into();
        let invalid = |reason: &str| OverlayError::InvalidModulePath {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("module path is empty"));
        }
        if path.contains('\\') {
            return Err(invalid("use `/` as the separator"));
        }
        if path.starts_with('/') {
            return Err(invalid("module path must be relative"));
        }

        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if segment == "." || segment == ".." {
                return Err(invalid("`.` and `..` segments are not allowed"));
            }
            if !SEGMENT_RE.is_match(segment) {
                return Err(invalid(&format!("invalid characters in segment `{}`", segment)));
            }
        }

        Ok(ModulePath(path))
    }

    /// The path as written, always `/`-separated.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Join this module path onto a filesystem directory using native separators.
    pub fn join_onto(&self, base: &Path) -> PathBuf {
        self.segments().fold(base.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModulePath {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModulePath::new(s)
    }
}

impl TryFrom<String> for ModulePath {
    type Error = OverlayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ModulePath::new(value)
    }
}

impl From<ModulePath> for String {
    fn from(path: ModulePath) -> Self {
        path.0
    }
}

/// Target language of generated code.
///
/// The set is open: any lower-case identifier is accepted, and each one maps
/// to its own subdirectory of the generated-code root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub const GO: &'static str = "go";
    pub const PYTHON: &'static str = "python";
    pub const JAVA: &'static str = "java";

    /// Parse and validate a language identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, OverlayError> {
        let name = name.into();
        if !LANGUAGE_RE.is_match(&name) {
            return Err(OverlayError::InvalidLanguage { name });
        }
        Ok(Language(name))
    }

    /// The Go language.
    pub fn go() -> Self {
        Language(Self::GO.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = OverlayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::new(value)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

/// One generated-code location for a (module path, language) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    /// Canonical module path, relative to the language directory
    pub module_path: ModulePath,

    /// Target language
    pub language: Language,

    /// Absolute path of the overlay directory
    pub location: PathBuf,
}

impl Overlay {
    /// Sort key used wherever overlays become externally visible.
    pub fn sort_key(&self) -> (&Language, &ModulePath) {
        (&self.language, &self.module_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_valid() {
        let path = ModulePath::new("proto/payments/ledger/v1").unwrap();
        assert_eq!(path.as_str(), "proto/payments/ledger/v1");
        assert_eq!(path.segments().count(), 4);

        assert!(ModulePath::new("proto/payments/ledger@v1.2.3").is_ok());
        assert!(ModulePath::new("single").is_ok());
    }

    #[test]
    fn test_module_path_rejects_escapes() {
        for bad in ["", "/abs/path", "a/../b", "./a", "a//b", "a/", "a\\b", "a/b c"] {
            let err = ModulePath::new(bad).unwrap_err();
            assert!(
                matches!(err, OverlayError::InvalidModulePath { .. }),
                "expected `{}` to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_module_path_join_onto() {
        let path = ModulePath::new("a/b/c").unwrap();
        let joined = path.join_onto(Path::new("/root/gen/go"));
        assert_eq!(joined, Path::new("/root/gen/go").join("a").join("b").join("c"));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!(Language::new("go").unwrap(), Language::go());
        assert!(Language::new("python").is_ok());
        assert!(Language::new("c++").is_ok());

        assert!(Language::new("").is_err());
        assert!(Language::new("Go").is_err());
        assert!(Language::new("go/x").is_err());
        assert!(Language::new("..").is_err());
    }

    #[test]
    fn test_module_path_serde() {
        let path: ModulePath = serde_yaml::from_str("proto/a/v1").unwrap();
        assert_eq!(path.as_str(), "proto/a/v1");

        let bad: Result<ModulePath, _> = serde_yaml::from_str("../escape");
        assert!(bad.is_err());
    }
}
