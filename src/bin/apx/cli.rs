//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use apx::util::ColorChoice;

/// apx - canonical imports backed by locally generated code
#[derive(Parser)]
#[command(name = "apx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit machine-readable JSON lines on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Run as if apx was started in this directory
    #[arg(short = 'C', long = "directory", global = true, env = "APX_DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a dependency to apx.yaml and apx.lock
    Add(AddArgs),

    /// Create overlay directories for locked dependencies
    Gen(GenArgs),

    /// Regenerate the workspace manifest from overlays on disk
    Sync(SyncArgs),

    /// List overlays
    List(ListArgs),

    /// Remove an overlay and switch to the published module
    Unlink(UnlinkArgs),

    /// Remove all overlays and resync the workspace manifest
    Clean,
}

#[derive(Args)]
pub struct AddArgs {
    /// Module to add, as <module-path>[@version]
    pub spec: String,
}

#[derive(Args)]
pub struct GenArgs {
    /// Target language (go, python, java, ...)
    pub language: String,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Remove all overlays before syncing
    #[arg(long)]
    pub clean: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list overlays for this language
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Args)]
pub struct UnlinkArgs {
    /// Canonical module path to unlink
    pub module_path: String,
}
