//! `apx clean` command

use anyhow::Result;

use crate::GlobalOptions;
use apx::core::Workspace;
use apx::ops::apx_sync::clean;
use apx::util::Status;

pub fn execute(global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ws = Workspace::discover(&global_opts.cwd)?;

    shell.status(Status::Cleaning, ws.gen_dir().display());
    let (removed, report) = clean(&ws)?;

    if removed {
        shell.status(Status::Removed, ws.gen_dir().display());
    } else {
        shell.note("no generated code to remove");
    }
    shell.status(Status::Updated, report.manifest_path.display());
    shell.json_event(&serde_json::json!({
        "reason": "cleaned",
        "removed": removed,
        "manifest": report.manifest_path,
    }));

    Ok(())
}
