//! `apx list` command

use anyhow::Result;

use crate::cli::ListArgs;
use crate::GlobalOptions;
use apx::core::{Language, Workspace};
use apx::ops::apx_sync::list_overlays;

pub fn execute(args: ListArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ws = Workspace::discover(&global_opts.cwd)?;

    let language = args.language.map(Language::new).transpose()?;
    let overlays = list_overlays(&ws, language.as_ref())?;

    if shell.is_json() {
        for overlay in &overlays {
            shell.json_event(&serde_json::json!({
                "reason": "overlay",
                "module_path": overlay.module_path,
                "language": overlay.language,
                "location": overlay.location,
            }));
        }
        return Ok(());
    }

    if overlays.is_empty() {
        shell.note("no overlays found");
        return Ok(());
    }

    let width = overlays
        .iter()
        .map(|o| o.language.as_str().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for overlay in &overlays {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            overlay.language.as_str(),
            overlay.module_path,
            width = width
        ));
    }
    shell.data(out);

    Ok(())
}
