//! Project configuration (`apx.yaml`).
//!
//! Only the keys this crate acts on are modelled; anything else in the file
//! is ignored on read and preserved when [`add_dependency_entry`] rewrites it.
//!
//! ```yaml
//! org: acme
//! repo: apis
//! dependencies:
//!   - proto/payments/ledger/v1
//! overlay:
//!   gen_dir: internal/gen
//!   host_language: go
//!   manifest_file: go.work
//!   directive: go 1.24
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::core::{Language, ModulePath};
use crate::overlay::HostBuild;
use crate::util::fs;

/// Project configuration file name.
pub const CONFIG_NAME: &str = "apx.yaml";

/// Canonical repository recorded when `org`/`repo` are not configured.
pub const DEFAULT_CANONICAL_REPO: &str = "github.com/org/apis";

/// Parsed `apx.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Organization owning the canonical API repository
    pub org: Option<String>,

    /// Canonical API repository name
    pub repo: Option<String>,

    /// Declared module dependencies
    pub dependencies: Vec<String>,

    /// Overlay layout settings
    pub overlay: OverlayConfig,
}

/// Where overlays live and what the workspace manifest looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Generated-code root, relative to the workspace root
    pub gen_dir: PathBuf,

    /// Language whose overlays go into the manifest
    pub host_language: Language,

    /// Manifest file name at the workspace root
    pub manifest_file: String,

    /// First line of the manifest
    pub directive: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        let host = HostBuild::default();
        OverlayConfig {
            gen_dir: PathBuf::from("internal").join("gen"),
            host_language: host.language,
            manifest_file: host.manifest_file,
            directive: host.directive,
        }
    }
}

impl OverlayConfig {
    /// Host build description for the manifest synchronizer.
    pub fn host_build(&self) -> HostBuild {
        HostBuild {
            language: self.host_language.clone(),
            manifest_file: self.manifest_file.clone(),
            directive: self.directive.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !fs::is_contained_relative(&self.gen_dir) {
            bail!(
                "overlay.gen_dir `{}` must be a relative path inside the workspace",
                self.gen_dir.display()
            );
        }
        if self.manifest_file.is_empty()
            || self.manifest_file.contains('/')
            || self.manifest_file.contains('\\')
            || self.manifest_file == "."
            || self.manifest_file == ".."
        {
            bail!(
                "overlay.manifest_file `{}` must be a plain file name",
                self.manifest_file
            );
        }
        if self.directive.trim().is_empty() || self.directive.contains('\n') {
            bail!("overlay.directive must be a single non-empty line");
        }
        Ok(())
    }
}

impl Config {
    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config
            .overlay
            .validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no {} at {}, using defaults", CONFIG_NAME, path.display());
            Ok(Self::default())
        }
    }

    /// Canonical repository dependencies are pinned against.
    pub fn canonical_repo(&self) -> String {
        match (&self.org, &self.repo) {
            (Some(org), Some(repo)) if !org.is_empty() && !repo.is_empty() => {
                format!("github.com/{}/{}", org, repo)
            }
            _ => DEFAULT_CANONICAL_REPO.to_string(),
        }
    }
}

/// Append `module_path` to the `dependencies` list in `apx.yaml`.
///
/// The file is edited as a YAML mapping so keys not modelled by [`Config`]
/// survive. Returns `false` when the entry was already present, in which
/// case the file is not rewritten.
pub fn add_dependency_entry(config_path: &Path, module_path: &ModulePath) -> Result<bool> {
    if !config_path.exists() {
        bail!(
            "{} not found at {}; create one before adding dependencies",
            CONFIG_NAME,
            config_path.display()
        );
    }

    let contents = fs::read_to_string(config_path)?;
    let mut doc: Mapping = if contents.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?
    };

    let entry = Value::String(module_path.to_string());

    let deps_value = doc
        .entry(Value::String("dependencies".to_string()))
        .or_insert(Value::Null);
    if deps_value.is_null() {
        *deps_value = Value::Sequence(Vec::new());
    }
    let deps = match deps_value {
        Value::Sequence(seq) => seq,
        _ => bail!("`dependencies` in {} must be a list", config_path.display()),
    };

    if deps.contains(&entry) {
        return Ok(false);
    }
    deps.push(entry);

    let updated = serde_yaml::to_string(&doc).context("failed to serialize apx.yaml")?;
    fs::write_string(config_path, &updated)?;
    Ok(true)
}
