//! Terminal and machine output for apx commands.
//!
//! A [`Shell`] is built once from the global flags and passed to every
//! command. Human output is a column of right-aligned status words on
//! stderr; `--json` swaps that for newline-delimited events on stdout.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;

const STATUS_WIDTH: usize = 12;
const RESET: &str = "\x1b[0m";

/// How much human-readable output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    #[default]
    Normal,
    /// Also print per-overlay detail.
    Verbose,
}

/// Where output goes and in what shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    /// One JSON object per line on stdout. Status lines are dropped.
    Json,
}

/// `--color` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!("unknown color mode `{}` (auto|always|never)", other)),
        }
    }
}

/// What a status line reports. The shell picks the word and the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Added,
    Created,
    Finished,
    Updated,
    Removed,
    Generating,
    Syncing,
    Cleaning,
    Info,
    Unchanged,
    Warning,
    Error,
}

#[derive(Clone, Copy)]
enum Tone {
    Done,
    Working,
    Neutral,
    Caution,
    Failure,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Done => "\x1b[1;32m",
            Tone::Working => "\x1b[1;36m",
            Tone::Neutral => "\x1b[1;34m",
            Tone::Caution => "\x1b[1;33m",
            Tone::Failure => "\x1b[1;31m",
        }
    }
}

impl Status {
    fn label(self) -> (&'static str, Tone) {
        match self {
            Status::Added => ("Added", Tone::Done),
            Status::Created => ("Created", Tone::Done),
            Status::Finished => ("Finished", Tone::Done),
            Status::Updated => ("Updated", Tone::Done),
            Status::Removed => ("Removed", Tone::Done),
            Status::Generating => ("Generating", Tone::Working),
            Status::Syncing => ("Syncing", Tone::Working),
            Status::Cleaning => ("Cleaning", Tone::Working),
            Status::Info => ("Info", Tone::Neutral),
            Status::Unchanged => ("Unchanged", Tone::Caution),
            Status::Warning => ("Warning", Tone::Caution),
            Status::Error => ("error", Tone::Failure),
        }
    }
}

/// Output sink shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    format: OutputFormat,
    verbosity: Verbosity,
    color: bool,
}

impl Shell {
    /// Resolve global flags. `--json` overrides `--quiet` and `--verbose`,
    /// and `--quiet` overrides `--verbose`.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        if json {
            return Shell {
                format: OutputFormat::Json,
                verbosity: Verbosity::Normal,
                color: false,
            };
        }

        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };

        Shell {
            format: OutputFormat::Human,
            verbosity,
            color: color.enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `{status:>12} {msg}` to stderr.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() {
            return;
        }
        if self.verbosity == Verbosity::Quiet && status != Status::Error {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Detail that only `--verbose` shows.
    pub fn verbose(&self, msg: impl Display) {
        if self.verbosity == Verbosity::Verbose {
            self.status(Status::Info, msg);
        }
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Report a failure. In JSON mode this becomes an `error` event.
    pub fn error(&self, msg: impl Display) {
        match self.format {
            OutputFormat::Json => self.json_event(&serde_json::json!({
                "reason": "error",
                "message": msg.to_string(),
            })),
            OutputFormat::Human => self.status(Status::Error, msg),
        }
    }

    /// Write command output (listings, previews) to stdout.
    ///
    /// Printed even with `--quiet`. Ignored in JSON mode.
    pub fn data(&self, text: impl Display) {
        if self.is_json() {
            return;
        }
        write_stdout(format_args!("{}", text));
    }

    /// Emit one JSON event line. No-op in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }
        write_stdout(format_args!("{}\n", event));
    }

    fn format_status(&self, status: Status) -> String {
        let (word, tone) = status.label();
        if self.color {
            format!("{}{:>w$}{}", tone.ansi(), word, RESET, w = STATUS_WIDTH)
        } else {
            format!("{:>w$}", word, w = STATUS_WIDTH)
        }
    }
}

fn write_stdout(args: std::fmt::Arguments<'_>) {
    let mut out = io::stdout().lock();
    // Write errors such as a closed pipe are ignored.
    let _ = out.write_fmt(args);
    let _ = out.flush();
}
