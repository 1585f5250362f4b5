//! Command registry and dispatch.
//!
//! `CommandKind` is the immutable registry: names and help lines for every
//! user-facing command, used by the help table and by completion. The
//! `Registry` and `Context` are built once in `main` and handed to every
//! handler; nothing here is global.

use crate::cli::Commands;
use crate::commands;
use crate::config::Effective;
use crate::error::{PathyError, Result};
use crate::models::known::KnownVariable;
use crate::pathlist::{RawPathList, LIST_SEPARATOR};
use crate::side_channel::SideChannel;
use std::ffi::OsString;
use std::io::{BufRead, Write};

pub const PROGNAME: &str = "pathy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Ls,
    LsNames,
    LsFiles,
    RunFiles,
    PutFirst,
    PutLast,
    Rm,
    Which,
    Shadow,
    Doctor,
    Edit,
    Export,
    Activate,
    Version,
}

impl CommandKind {
    pub const ALL: [CommandKind; 14] = [
        CommandKind::Ls,
        CommandKind::LsNames,
        CommandKind::LsFiles,
        CommandKind::RunFiles,
        CommandKind::PutFirst,
        CommandKind::PutLast,
        CommandKind::Rm,
        CommandKind::Which,
        CommandKind::Shadow,
        CommandKind::Doctor,
        CommandKind::Edit,
        CommandKind::Export,
        CommandKind::Activate,
        CommandKind::Version,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Ls => "ls",
            CommandKind::LsNames => "ls-names",
            CommandKind::LsFiles => "ls-files",
            CommandKind::RunFiles => "run-files",
            CommandKind::PutFirst => "put-first",
            CommandKind::PutLast => "put-last",
            CommandKind::Rm => "rm",
            CommandKind::Which => "which",
            CommandKind::Shadow => "shadow",
            CommandKind::Doctor => "doctor",
            CommandKind::Edit => "edit",
            CommandKind::Export => "export",
            CommandKind::Activate => "activate",
            CommandKind::Version => "version",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            CommandKind::Ls => "List path entries (in order from first to last)",
            CommandKind::LsNames => "List all files in path (names only)",
            CommandKind::LsFiles => "List all files in path (full pathnames)",
            CommandKind::RunFiles => "Run program, feeding it filenames on stdin",
            CommandKind::PutFirst => "Add or move the given entry to the beginning of the path",
            CommandKind::PutLast => "Add or move the given entry to the end of the path",
            CommandKind::Rm => "Remove path entries (you'll be asked for each entry)",
            CommandKind::Which => "See which file matches first in path",
            CommandKind::Shadow => "Show name conflicts",
            CommandKind::Doctor => "Find potential path problems",
            CommandKind::Edit => "Edit the path in EDITOR or another program",
            CommandKind::Export => "Generate an export statement in shell syntax",
            CommandKind::Activate => "Try this in your shell: eval \"$(pathy activate)\"",
            CommandKind::Version => "Show version information",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Commands whose arguments are names looked up in the path.
    pub fn takes_names(self) -> bool {
        matches!(
            self,
            CommandKind::Which | CommandKind::LsNames | CommandKind::Shadow
        )
    }
}

#[derive(Debug, Clone)]
/// Startup-built tables shared by the dispatcher and completion.
pub struct Registry {
    pub commands: &'static [CommandKind],
    pub known: Vec<KnownVariable>,
}

impl Registry {
    pub fn new(known: Vec<KnownVariable>) -> Self {
        Self {
            commands: &CommandKind::ALL,
            known,
        }
    }

    pub fn known(&self, var: &str) -> Option<&KnownVariable> {
        self.known.iter().find(|k| k.name == var)
    }

    /// Help table, one `pathy <name> <help>` line per command.
    pub fn help_text(&self) -> String {
        let mut s = format!(
            "This is {}, helping you work with PATH and similar environment variables.\n",
            PROGNAME
        );
        s.push_str(&format!("Try `{} <command> --help` for details.\n\n", PROGNAME));
        for kind in self.commands {
            s.push_str(&format!("{} {:<12} {}\n", PROGNAME, kind.name(), kind.help()));
        }
        s
    }
}

/// Everything a handler may consult. The variable is read once at startup
/// and kept as the bytes the environment held.
pub struct Context {
    pub settings: Effective,
    pub registry: Registry,
    pub value: OsString,
    pub channel: SideChannel,
}

impl Context {
    pub fn new(
        settings: Effective,
        registry: Registry,
        value: impl Into<OsString>,
        channel: SideChannel,
    ) -> Self {
        Self {
            settings,
            registry,
            value: value.into(),
            channel,
        }
    }

    /// Raw list for display. Bytes that are not UTF-8 show as U+FFFD.
    pub fn raw_list(&self) -> RawPathList {
        RawPathList::parse(&self.value.to_string_lossy(), LIST_SEPARATOR)
    }

    /// Raw list for commands that write the variable back. A value that is
    /// not UTF-8 is refused rather than published altered.
    pub fn raw_list_exact(&self) -> Result<RawPathList> {
        let value = self.value.to_str().ok_or_else(|| PathyError::NotUnicode {
            var: self.settings.var.clone(),
        })?;
        Ok(RawPathList::parse(value, LIST_SEPARATOR))
    }

    pub fn var(&self) -> &str {
        &self.settings.var
    }
}

/// Run the selected command and return the process exit status.
///
/// No command, `help`, and unknown command names all print the help table
/// and exit with status 1.
pub fn dispatch(
    cmd: Option<Commands>,
    ctx: &Context,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<i32> {
    let Some(cmd) = cmd else {
        return commands::help(ctx, out);
    };
    tracing::debug!(command = ?cmd.kind().map(CommandKind::name), "dispatching");
    match cmd {
        Commands::Ls { keys } => commands::ls(ctx, &keys, out),
        Commands::LsNames { keys } => commands::ls_names(ctx, &keys, out),
        Commands::LsFiles { keys } => commands::ls_files(ctx, &keys, out),
        Commands::RunFiles { program } => commands::run_files(ctx, &program),
        Commands::PutFirst { dirs } => commands::put_first(ctx, &dirs),
        Commands::PutLast { dirs } => commands::put_last(ctx, &dirs),
        Commands::Rm { keys } => commands::rm(ctx, &keys, input, out),
        Commands::Which { names } => commands::which(ctx, &names, out),
        Commands::Shadow { keys } => commands::shadow(ctx, &keys, out),
        Commands::Doctor { fix, check_dirs } => {
            commands::doctor(ctx, fix, check_dirs || ctx.settings.check_dirs, out)
        }
        Commands::Edit { editor } => commands::edit(ctx, &editor),
        Commands::Export => commands::export(ctx, out),
        Commands::Activate => commands::activate(out),
        Commands::Version => commands::version(out),
        Commands::Complete { cword, words } => commands::complete(ctx, &cword, &words, out),
        Commands::Help | Commands::External(_) => commands::help(ctx, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::known;

    #[test]
    fn test_from_name_round_trips() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CommandKind::from_name("help"), None);
        assert_eq!(CommandKind::from_name("LS"), None);
    }

    #[test]
    fn test_help_text_lists_every_command() {
        let reg = Registry::new(known::builtin());
        let text = reg.help_text();
        for kind in CommandKind::ALL {
            assert!(text.contains(&format!("pathy {:<12} {}", kind.name(), kind.help())));
        }
    }

    #[test]
    fn test_known_lookup() {
        let reg = Registry::new(known::builtin());
        assert!(reg.known("PYTHONPATH").unwrap().subdirs);
        assert!(reg.known("MANPATH").is_none());
    }
}
