//! `apx unlink` command

use anyhow::Result;

use crate::cli::UnlinkArgs;
use crate::GlobalOptions;
use apx::core::{ModulePath, Workspace};
use apx::ops::apx_unlink::unlink;
use apx::util::Status;

pub fn execute(args: UnlinkArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let module_path = ModulePath::new(args.module_path)?;
    let ws = Workspace::discover(&global_opts.cwd)?;

    let result = unlink(&ws, &module_path)?;

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "unlinked",
            "module_path": result.module_path,
            "removed": result.removed.iter().map(|o| &o.location).collect::<Vec<_>>(),
            "manifest": result.sync.manifest_path,
            "hint": result.published_hint(),
        }));
        return Ok(());
    }

    if result.had_no_overlay() {
        shell.warn(format!("no overlay on disk for {}", module_path));
    }
    for overlay in &result.removed {
        shell.status(
            Status::Removed,
            format!("{} ({})", overlay.location.display(), overlay.language),
        );
    }
    shell.status(Status::Updated, result.sync.manifest_path.display());
    shell.status(
        Status::Finished,
        format!("unlinked {}; now using the published module", module_path),
    );
    shell.note(format!("run `{}` to add it", result.published_hint()));

    Ok(())
}
