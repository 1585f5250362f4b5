//! CLI argument parsing via `clap`.

use crate::dispatch::CommandKind;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pathy",
    about = "Inspect, lint and edit PATH-like environment variables",
    long_about = "Pathy inspects, lints and edits PATH and similar environment variables.\n\nCommands that change the variable only work through the shell function installed by `eval \"$(pathy activate)\"`.\n\nConfiguration precedence: CLI > pathy.toml > defaults.",
    after_help = "Examples:\n  pathy ls\n  pathy -V PYTHONPATH shadow\n  pathy put-first ~/bin\n  pathy doctor --check-dirs",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(
        short = 'V',
        long = "var",
        global = true,
        value_name = "VARNAME",
        help = "Environment variable to use (default: PATH)"
    )]
    pub var: Option<String>,
    #[arg(long, global = true, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory holding pathy.toml (default: ~/.config/pathy)"
    )]
    pub config_dir: Option<String>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
/// Supported subcommands. Unknown names land in `External`.
pub enum Commands {
    /// List path entries (in order from first to last)
    Ls {
        #[arg(help = "Only entries matching one of these regexes")]
        keys: Vec<String>,
    },
    /// List all files in path (names only)
    LsNames {
        #[arg(help = "Only names matching one of these regexes")]
        keys: Vec<String>,
    },
    /// List all files in path (full pathnames)
    LsFiles {
        #[arg(help = "Only files matching one of these regexes")]
        keys: Vec<String>,
    },
    /// Run program, feeding it filenames on stdin
    RunFiles {
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "PROGRAM"
        )]
        program: Vec<String>,
    },
    /// Add or move the given entry to the beginning of the path
    PutFirst {
        #[arg(required = true, value_name = "DIR")]
        dirs: Vec<String>,
    },
    /// Add or move the given entry to the end of the path
    PutLast {
        #[arg(required = true, value_name = "DIR")]
        dirs: Vec<String>,
    },
    /// Remove path entries (you'll be asked for each entry)
    Rm {
        #[arg(help = "Only ask about entries matching one of these regexes")]
        keys: Vec<String>,
    },
    /// See which file matches first in path
    Which {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Show name conflicts
    Shadow {
        #[arg(help = "Only names matching one of these regexes")]
        keys: Vec<String>,
    },
    /// Find potential path problems
    Doctor {
        #[arg(long, help = "Write the fixed list back to the shell")]
        fix: bool,
        #[arg(long, help = "Also check that every entry is a safe, existing directory")]
        check_dirs: bool,
    },
    /// Edit the path in EDITOR or another program
    Edit {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "EDITOR")]
        editor: Vec<String>,
    },
    /// Generate an export statement in shell syntax
    Export,
    /// Print the shell function that routes changes back to your shell
    Activate,
    /// Show version information
    Version,
    /// Show this command list
    Help,
    /// Completion candidates for the activation hook
    #[command(hide = true)]
    Complete {
        cword: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    #[command(external_subcommand)]
    External(Vec<String>),
}

impl Commands {
    /// Registry kind for this invocation, `None` for unknown names and the
    /// built-in `help`/`complete` entries.
    pub fn kind(&self) -> Option<CommandKind> {
        Some(match self {
            Commands::Ls { .. } => CommandKind::Ls,
            Commands::LsNames { .. } => CommandKind::LsNames,
            Commands::LsFiles { .. } => CommandKind::LsFiles,
            Commands::RunFiles { .. } => CommandKind::RunFiles,
            Commands::PutFirst { .. } => CommandKind::PutFirst,
            Commands::PutLast { .. } => CommandKind::PutLast,
            Commands::Rm { .. } => CommandKind::Rm,
            Commands::Which { .. } => CommandKind::Which,
            Commands::Shadow { .. } => CommandKind::Shadow,
            Commands::Doctor { .. } => CommandKind::Doctor,
            Commands::Edit { .. } => CommandKind::Edit,
            Commands::Export => CommandKind::Export,
            Commands::Activate => CommandKind::Activate,
            Commands::Version => CommandKind::Version,
            Commands::Help | Commands::Complete { .. } | Commands::External(_) => return None,
        })
    }
}
