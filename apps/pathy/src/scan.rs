//! Shallow directory enumeration over path entries.
//!
//! Each entry is listed one level deep with a `*` glob. A directory that
//! is missing or unreadable simply contributes nothing.

use crate::models::known::KnownVariable;
use crate::utils::sort_case_insensitive;
use glob::{glob, Pattern};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Children of `dir`, in glob order.
pub fn dir_children(dir: &str) -> Vec<PathBuf> {
    let pattern = Path::new(&Pattern::escape(dir)).join("*");
    let pattern = pattern.to_string_lossy();
    let paths = match glob(&pattern) {
        Ok(p) => p,
        Err(e) => {
            tracing::trace!(dir, error = %e, "unusable glob pattern");
            return Vec::new();
        }
    };
    paths.filter_map(|entry| entry.ok()).collect()
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Full paths of every file in every directory, case-insensitively sorted.
pub fn list_files(dirs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = dirs
        .iter()
        .flat_map(|d| dir_children(d))
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    sort_case_insensitive(&mut out);
    out
}

/// Unique file names across all directories, sorted.
pub fn list_names(dirs: &[String]) -> Vec<String> {
    let names: BTreeSet<String> = dirs
        .iter()
        .flat_map(|d| dir_children(d))
        .filter_map(|p| file_name(&p))
        .collect();
    names.into_iter().collect()
}

/// Names accepted by `keep` that occur in two or more directories, each
/// mapped to its directories in search order.
pub fn shadowed<F>(dirs: &[String], keep: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for dir in dirs {
        for child in dir_children(dir) {
            if let Some(name) = file_name(&child) {
                if keep(&name) {
                    by_name.entry(name).or_default().push(dir.clone());
                }
            }
        }
    }
    by_name.retain(|_, ds| ds.len() > 1);
    by_name
}

/// First `<dir>/<name>` that exists, without following a final symlink.
pub fn which(dirs: &[String], name: &str) -> Option<String> {
    dirs.iter()
        .map(|d| Path::new(d).join(name))
        .find(|p| p.symlink_metadata().is_ok())
        .map(|p| p.to_string_lossy().to_string())
}

/// Completion candidates for lookups in a variable described by `known`.
pub fn lookup_names(dirs: &[String], known: Option<&KnownVariable>) -> Vec<String> {
    let names: BTreeSet<String> = dirs
        .iter()
        .flat_map(|d| dir_children(d))
        .filter(|p| match known {
            Some(k) if k.subdirs => p.is_dir() || (!k.extensions.is_empty() && p.is_file()),
            _ => true,
        })
        .filter_map(|p| {
            let name = file_name(&p)?;
            match known {
                Some(k) if p.is_file() && !k.accepts_name(&name) => None,
                _ => Some(name),
            }
        })
        .collect();
    names.into_iter().collect()
}
