//! Implementation of `apx add`.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::core::{DependencyLock, ModulePath, Workspace};
use crate::ops::lockfile::LockStore;
use crate::util::config;

/// Ref recorded when no version is given.
pub const LATEST_REF: &str = "latest";

/// Options for adding a dependency.
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Canonical module path
    pub module_path: ModulePath,

    /// Requested version; `None` means latest
    pub version: Option<String>,
}

impl AddOptions {
    /// Parse `<module-path>[@version]`.
    ///
    /// The split happens at the last `@` unless what follows contains a `/`,
    /// so `@` in an earlier segment stays part of the path. A final segment
    /// that itself contains `@` needs an explicit ref, as in
    /// `proto/ledger@v1.2.3@latest`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (path, version) = match spec.rsplit_once('@') {
            Some((path, version)) if !version.contains('/') => (path, Some(version.to_string())),
            _ => (spec, None),
        };

        let module_path = ModulePath::new(path)?;
        if let Some(ref v) = version {
            validate_version(v)?;
        }

        Ok(AddOptions {
            module_path,
            version,
        })
    }

    /// The ref that will be written to the lock file.
    pub fn source_ref(&self) -> &str {
        self.version.as_deref().unwrap_or(LATEST_REF)
    }
}

/// Result of adding a dependency.
#[derive(Debug, Clone, Serialize)]
pub struct AddResult {
    pub module_path: ModulePath,
    pub lock: DependencyLock,
    /// Whether apx.yaml gained a new entry
    pub config_updated: bool,
}

/// Accept `latest` or a semantic version with an optional `v` prefix.
pub fn validate_version(version: &str) -> Result<()> {
    if version == LATEST_REF {
        return Ok(());
    }

    let bare = version.strip_prefix('v').unwrap_or(version);
    if bare.is_empty() {
        bail!("empty version after `@`");
    }
    semver::Version::parse(bare)
        .with_context(|| format!("invalid version `{}`: expected `latest` or a semantic version like v1.2.3", version))?;
    Ok(())
}

/// Record the dependency in apx.yaml and pin it in apx.lock.
pub fn add_dependency(ws: &Workspace, opts: &AddOptions) -> Result<AddResult> {
    let config_updated = config::add_dependency_entry(&ws.config_path(), &opts.module_path)?;

    let store = LockStore::new(ws.lockfile_path());
    let lock = store
        .add(&opts.module_path, opts.source_ref(), &ws.config().canonical_repo())
        .context("failed to update lockfile")?;

    tracing::debug!("pinned {} at {}", opts.module_path, lock.source_ref);

    Ok(AddResult {
        module_path: opts.module_path.clone(),
        lock,
        config_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::config::CONFIG_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_parse_with_version() {
        let opts = AddOptions::parse("proto/payments/ledger/v1@v1.2.3").unwrap();
        assert_eq!(opts.module_path.as_str(), "proto/payments/ledger/v1");
        assert_eq!(opts.source_ref(), "v1.2.3");
    }

    #[test]
    fn test_parse_without_version() {
        let opts = AddOptions::parse("proto/payments/wallet/v1").unwrap();
        assert_eq!(opts.version, None);
        assert_eq!(opts.source_ref(), "latest");
    }

    #[test]
    fn test_parse_rejects_bad_versions() {
        assert!(AddOptions::parse("proto/a/v1@banana").is_err());
        assert!(AddOptions::parse("proto/a/v1@").is_err());
        assert!(AddOptions::parse("proto/a/v1@v1.2").is_err());
        assert!(AddOptions::parse("../a@v1.0.0").is_err());
    }

    #[test]
    fn test_parse_at_inside_path() {
        let opts = AddOptions::parse("proto/ledger@v1.2.3@latest").unwrap();
        assert_eq!(opts.module_path.as_str(), "proto/ledger@v1.2.3");
        assert_eq!(opts.source_ref(), "latest");

        let opts = AddOptions::parse("proto/ledger@v1/v1").unwrap();
        assert_eq!(opts.module_path.as_str(), "proto/ledger@v1/v1");
        assert_eq!(opts.version, None);

        let opts = AddOptions::parse("proto/ledger@v1.2.3").unwrap();
        assert_eq!(opts.module_path.as_str(), "proto/ledger");
        assert_eq!(opts.source_ref(), "v1.2.3");
    }

    #[test]
    fn test_parse_accepts_prerelease() {
        let opts = AddOptions::parse("openapi/customer/accounts/v2@v2.0.0-beta.1").unwrap();
        assert_eq!(opts.source_ref(), "v2.0.0-beta.1");
    }

    #[test]
    fn test_add_dependency_updates_both_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_NAME), "org: acme\nrepo: apis\n").unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();

        let opts = AddOptions::parse("proto/payments/ledger/v1@v1.2.3").unwrap();
        let result = add_dependency(&ws, &opts).unwrap();

        assert!(result.config_updated);
        assert_eq!(result.lock.source_repo, "github.com/acme/apis");

        let lock = std::fs::read_to_string(ws.lockfile_path()).unwrap();
        assert!(lock.contains("proto/payments/ledger/v1"));
        assert!(lock.contains("v1.2.3"));
    }

    #[test]
    fn test_add_without_config_fails_before_locking() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();

        let opts = AddOptions::parse("proto/a/v1").unwrap();
        assert!(add_dependency(&ws, &opts).is_err());
        assert!(!ws.lockfile_path().exists());
    }
}
