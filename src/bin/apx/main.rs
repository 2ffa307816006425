//! apx CLI - canonical imports backed by locally generated code

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apx::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Settings shared by every command, resolved once from global flags.
pub struct GlobalOptions {
    pub shell: Shell,
    pub cwd: PathBuf,
}

fn main() {
    // Parse CLI
    let cli = Cli::parse();
    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, cli.json);

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("apx=debug")
    } else {
        EnvFilter::new("apx=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cwd = match resolve_cwd(cli.directory.clone()) {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    };

    let global_opts = GlobalOptions { shell, cwd };

    if let Err(e) = run(cli.command, &global_opts) {
        if global_opts.shell.is_json() {
            global_opts.shell.error(format!("{:#}", e));
        }
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn resolve_cwd(directory: Option<PathBuf>) -> Result<PathBuf> {
    match directory {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("failed to determine current directory"),
    }
}

fn run(command: Commands, global_opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Add(args) => commands::add::execute(args, global_opts),
        Commands::Gen(args) => commands::generate::execute(args, global_opts),
        Commands::Sync(args) => commands::sync::execute(args, global_opts),
        Commands::List(args) => commands::list::execute(args, global_opts),
        Commands::Unlink(args) => commands::unlink::execute(args, global_opts),
        Commands::Clean => commands::clean::execute(global_opts),
    }
}
