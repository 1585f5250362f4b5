//! Completion candidates for the shell hook installed by `activate`.
//!
//! The hook calls `pathy complete <cword> <words...>` where `words` is the
//! shell's word array (program first) and `cword` indexes the word being
//! completed. Candidates carry a trailing space because the hook runs with
//! `-o nospace`; partial names are left open for further typing.

use crate::dispatch::{CommandKind, Registry};
use crate::models::known::KnownVariable;
use crate::pathlist::{RawPathList, LIST_SEPARATOR};
use crate::scan;

/// Where the word being completed sits in the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    VarName,
    Command,
    Argument { command: String, var: Option<String> },
    Nothing,
}

/// Parse a completion index; `None` for anything unusable.
pub fn parse_cword(cword: &str, words: &[String]) -> Option<usize> {
    let n: usize = cword.trim().parse().ok()?;
    if n < 1 || n > words.len() {
        return None;
    }
    Some(n)
}

/// Classify position `cword` of `words`.
///
/// `-V`/`--var` is global, so it is honored before or after the command.
pub fn classify(cword: usize, words: &[String]) -> Slot {
    let prev = words.get(cword.wrapping_sub(1)).map(String::as_str);
    if is_var_flag(prev) {
        return Slot::VarName;
    }
    if takes_value(prev) {
        return Slot::Nothing;
    }
    let mut var = None;
    let mut command: Option<String> = None;
    let mut i = 1;
    while i < cword {
        let w = words[i].as_str();
        if is_var_flag(Some(w)) {
            var = words.get(i + 1).cloned();
            i += 2;
            continue;
        }
        if let Some(v) = w.strip_prefix("--var=") {
            var = Some(v.to_string());
        } else if takes_value(Some(w)) {
            i += 1;
        } else if !w.starts_with('-') && command.is_none() {
            command = Some(w.to_string());
        }
        i += 1;
    }
    if let Some(command) = command {
        return Slot::Argument { command, var };
    }
    let current = words.get(cword).map(String::as_str).unwrap_or("");
    if current.starts_with('-') {
        Slot::Nothing
    } else {
        Slot::Command
    }
}

fn is_var_flag(w: Option<&str>) -> bool {
    matches!(w, Some("-V") | Some("--var"))
}

/// Other global flags whose value is the next word.
fn takes_value(w: Option<&str>) -> bool {
    matches!(w, Some("--output") | Some("--config-dir"))
}

/// Candidates for position `cword`. `lookup` resolves a variable's value.
pub fn candidates<F>(
    registry: &Registry,
    default_var: &str,
    cword: usize,
    words: &[String],
    lookup: F,
) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let prefix = words.get(cword).map(String::as_str).unwrap_or("");
    let all: Vec<String> = match classify(cword, words) {
        Slot::VarName => registry.known.iter().map(|k| k.name.clone()).collect(),
        Slot::Command => registry
            .commands
            .iter()
            .map(|k| k.name().to_string())
            .collect(),
        Slot::Argument { command, var } => {
            match CommandKind::from_name(&command) {
                Some(kind) if kind.takes_names() => {
                    let var = var.unwrap_or_else(|| default_var.to_string());
                    let known: Option<&KnownVariable> = registry.known(&var);
                    let clean = RawPathList::parse(&lookup(&var), LIST_SEPARATOR).clean();
                    scan::lookup_names(clean.entries(), known)
                }
                _ => Vec::new(),
            }
        }
        Slot::Nothing => Vec::new(),
    };
    all.into_iter()
        .filter(|c| c.starts_with(prefix))
        .map(|c| format!("{} ", c))
        .collect()
}
