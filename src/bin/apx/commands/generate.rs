//! `apx gen` command

use anyhow::Result;

use crate::cli::GenArgs;
use crate::GlobalOptions;
use apx::core::{Language, Workspace};
use apx::ops::apx_gen::{gen_overlays, GenOptions};
use apx::util::Status;

pub fn execute(args: GenArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let language = Language::new(args.language)?;
    let ws = Workspace::discover(&global_opts.cwd)?;

    shell.status(
        Status::Generating,
        format!("{} overlays from {}", language, ws.lockfile_path().display()),
    );

    let result = gen_overlays(&ws, &GenOptions { language })?;

    if result.overlays.is_empty() {
        shell.note("no dependencies found in apx.lock");
        return Ok(());
    }

    for overlay in &result.overlays {
        shell.status(Status::Created, overlay.location.display());
        shell.json_event(&serde_json::json!({
            "reason": "overlay-created",
            "module_path": overlay.module_path,
            "language": overlay.language,
            "location": overlay.location,
        }));
    }

    if let Some(ref sync) = result.sync {
        shell.status(Status::Updated, sync.manifest_path.display());
        shell.json_event(&serde_json::json!({
            "reason": "manifest-synced",
            "manifest": sync.manifest_path,
            "entries": sync.entries,
        }));
    }

    shell.status(
        Status::Finished,
        format!("{} overlay(s) ready for code generation", result.overlays.len()),
    );
    Ok(())
}
