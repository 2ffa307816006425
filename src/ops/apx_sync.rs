//! Implementation of `apx sync`, `apx list` and `apx clean`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{Language, Overlay, Workspace};
use crate::overlay::SyncReport;

/// Options for `apx sync`.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Remove the whole generated-code root first
    pub clean: bool,

    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
}

/// What `apx sync` did (or would do).
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Whether the generated-code root was (or would be) removed
    pub cleaned: bool,

    /// Overlays present after the clean step, sorted
    pub overlays: Vec<Overlay>,

    /// Written manifest; `None` on dry runs
    pub report: Option<SyncReport>,

    /// Manifest content that would be written; only on dry runs
    pub preview: Option<String>,
}

/// Overlays in the workspace, sorted by language then module path.
pub fn list_overlays(ws: &Workspace, language: Option<&Language>) -> Result<Vec<Overlay>> {
    let store = ws.overlay_store();
    let mut overlays = match language {
        Some(lang) => store.list_language(lang),
        None => store.list(),
    }
    .context("failed to list overlays")?;

    overlays.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(overlays)
}

/// Regenerate the workspace manifest, optionally after a full clean.
pub fn sync(ws: &Workspace, opts: &SyncOptions) -> Result<SyncOutcome> {
    let store = ws.overlay_store();
    let synchronizer = ws.synchronizer();

    if opts.dry_run {
        let cleaned = opts.clean && store.root().exists();
        let (overlays, preview) = if opts.clean {
            (Vec::new(), crate::overlay::render_manifest(&synchronizer.host().directive, &[]))
        } else {
            (
                list_overlays(ws, None)?,
                synchronizer.render().context("failed to render workspace manifest")?,
            )
        };
        return Ok(SyncOutcome {
            cleaned,
            overlays,
            report: None,
            preview: Some(preview),
        });
    }

    let cleaned = if opts.clean {
        store.clean_all().context("failed to clean overlays")?
    } else {
        false
    };

    let overlays = list_overlays(ws, None)?;
    let report = synchronizer
        .sync()
        .context("failed to sync workspace manifest")?;

    Ok(SyncOutcome {
        cleaned,
        overlays,
        report: Some(report),
        preview: None,
    })
}

/// Remove every overlay and rewrite the manifest with only the root module.
pub fn clean(ws: &Workspace) -> Result<(bool, SyncReport)> {
    let outcome = sync(
        ws,
        &SyncOptions {
            clean: true,
            dry_run: false,
        },
    )?;
    let report = outcome
        .report
        .context("sync produced no manifest report")?;
    Ok((outcome.cleaned, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModulePath;
    use tempfile::TempDir;

    fn create(ws: &Workspace, path: &str, lang: &str) {
        ws.overlay_store()
            .create(&ModulePath::new(path).unwrap(), &Language::new(lang).unwrap())
            .unwrap();
    }

    #[test]
    fn test_list_is_sorted() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();
        create(&ws, "b/v1", "python");
        create(&ws, "b/v1", "go");
        create(&ws, "a/v1", "go");

        let listed: Vec<_> = list_overlays(&ws, None)
            .unwrap()
            .iter()
            .map(|o| format!("{}:{}", o.language, o.module_path))
            .collect();
        assert_eq!(listed, vec!["go:a/v1", "go:b/v1", "python:b/v1"]);

        let python = list_overlays(&ws, Some(&Language::new("python").unwrap())).unwrap();
        assert_eq!(python.len(), 1);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();
        create(&ws, "a/v1", "go");

        let outcome = sync(&ws, &SyncOptions { clean: true, dry_run: true }).unwrap();
        assert!(outcome.cleaned);
        assert!(outcome.report.is_none());
        assert_eq!(outcome.preview.as_deref(), Some("go 1.24\n\nuse (\n\t.\n)\n"));
        assert!(ws.gen_dir().join("go/a/v1").exists());
        assert!(!ws.manifest_path().exists());

        let outcome = sync(&ws, &SyncOptions { clean: false, dry_run: true }).unwrap();
        assert!(outcome.preview.unwrap().contains("./internal/gen/go/a/v1"));
        assert!(!ws.manifest_path().exists());
    }

    #[test]
    fn test_sync_with_clean() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();
        create(&ws, "a/v1", "go");

        let outcome = sync(&ws, &SyncOptions { clean: true, dry_run: false }).unwrap();
        assert!(outcome.cleaned);
        assert!(outcome.overlays.is_empty());
        assert!(!ws.gen_dir().exists());

        let content = std::fs::read_to_string(ws.manifest_path()).unwrap();
        assert!(!content.contains("a/v1"));
    }

    #[test]
    fn test_clean_never_targets_project_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("apx.yaml"), "overlay:\n  gen_dir: .\n").unwrap();
        std::fs::write(tmp.path().join("main.go"), "package main").unwrap();

        assert!(Workspace::at(tmp.path()).is_err());

        // Even with a hand-built store pointing at the project, nothing goes.
        let store = crate::overlay::OverlayStore::new(tmp.path().join("."))
            .with_workspace_root(tmp.path());
        assert!(store.clean_all().is_err());
        assert!(tmp.path().join("apx.yaml").exists());
        assert!(tmp.path().join("main.go").exists());
    }

    #[test]
    fn test_clean_on_fresh_workspace() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::at(tmp.path()).unwrap();

        let (cleaned, report) = clean(&ws).unwrap();
        assert!(!cleaned);
        assert!(report.entries.is_empty());
    }
}
