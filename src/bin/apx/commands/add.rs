//! `apx add` command

use anyhow::Result;

use crate::cli::AddArgs;
use crate::GlobalOptions;
use apx::core::Workspace;
use apx::ops::apx_add::{add_dependency, AddOptions};
use apx::util::Status;

pub fn execute(args: AddArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let opts = AddOptions::parse(&args.spec)?;
    let ws = Workspace::discover(&global_opts.cwd)?;

    let result = add_dependency(&ws, &opts)?;

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "dependency-added",
            "module_path": result.module_path,
            "repo": result.lock.source_repo,
            "ref": result.lock.source_ref,
        }));
        return Ok(());
    }

    if opts.version.is_some() {
        shell.status(
            Status::Added,
            format!("{}@{}", result.module_path, result.lock.source_ref),
        );
    } else {
        shell.status(
            Status::Added,
            format!("{} (latest version)", result.module_path),
        );
    }
    if !result.config_updated {
        shell.verbose(format!("{} was already listed in apx.yaml", result.module_path));
    }

    Ok(())
}
