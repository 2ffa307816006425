//! `apx sync` command

use anyhow::Result;

use crate::cli::SyncArgs;
use crate::GlobalOptions;
use apx::core::Workspace;
use apx::ops::apx_sync::{sync, SyncOptions};
use apx::util::Status;

pub fn execute(args: SyncArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ws = Workspace::discover(&global_opts.cwd)?;

    let opts = SyncOptions {
        clean: args.clean,
        dry_run: args.dry_run,
    };

    shell.status(Status::Syncing, ws.manifest_path().display());
    let outcome = sync(&ws, &opts)?;

    if outcome.cleaned {
        if opts.dry_run {
            shell.note(format!("would remove {}", ws.gen_dir().display()));
        } else {
            shell.status(Status::Removed, ws.gen_dir().display());
        }
    }

    if outcome.overlays.is_empty() {
        shell.note("no overlays found");
    }
    for overlay in &outcome.overlays {
        shell.verbose(format!("{} ({})", overlay.module_path, overlay.language));
    }

    if let Some(preview) = outcome.preview {
        shell.note(format!(
            "would write {} (dry run):",
            ws.manifest_path().display()
        ));
        shell.data(&preview);
        shell.json_event(&serde_json::json!({
            "reason": "sync-preview",
            "cleaned": outcome.cleaned,
            "content": preview,
        }));
        return Ok(());
    }

    if let Some(report) = outcome.report {
        let status = if report.changed {
            Status::Updated
        } else {
            Status::Unchanged
        };
        shell.status(
            status,
            format!(
                "{} ({} overlay entr{})",
                report.manifest_path.display(),
                report.entries.len(),
                if report.entries.len() == 1 { "y" } else { "ies" }
            ),
        );
        shell.json_event(&serde_json::json!({
            "reason": "manifest-synced",
            "cleaned": outcome.cleaned,
            "manifest": report.manifest_path,
            "entries": report.entries,
            "changed": report.changed,
        }));
    }

    Ok(())
}
