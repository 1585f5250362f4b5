//! Filesystem checks doctor runs on request (`--check-dirs`).
//!
//! Each distinct non-blank entry is stat'ed once; later duplicates are
//! already reported by the duplicate rule. Findings are appended to the
//! entry's report and never touch the fixed list.

use crate::models::{DoctorReport, Finding, ProblemClass};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Outcome of stat'ing one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirStatus {
    Missing,
    NotADirectory(&'static str),
    Directory { world_writable: bool },
}

pub fn stat_dir(entry: &str) -> DirStatus {
    let meta = match fs::metadata(Path::new(entry)) {
        Ok(m) => m,
        Err(_) => return DirStatus::Missing,
    };
    if meta.is_dir() {
        return DirStatus::Directory {
            world_writable: world_writable(&meta),
        };
    }
    DirStatus::NotADirectory(kind_name(&meta))
}

#[cfg(unix)]
fn world_writable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o002 != 0
}

#[cfg(not(unix))]
fn world_writable(_meta: &fs::Metadata) -> bool {
    false
}

fn kind_name(meta: &fs::Metadata) -> &'static str {
    let ft = meta.file_type();
    if ft.is_file() {
        return "file";
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_fifo() {
            return "pipe";
        }
        if ft.is_socket() {
            return "socket";
        }
        if ft.is_block_device() || ft.is_char_device() {
            return "device";
        }
    }
    "unknown"
}

/// Append directory findings to `report` and return how many were added.
pub fn check_dirs(report: &mut DoctorReport) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut added = 0usize;
    for er in report.entries.iter_mut() {
        if er.entry.is_empty() || !seen.insert(er.entry.clone()) {
            continue;
        }
        let finding = match stat_dir(&er.entry) {
            DirStatus::Missing => Some((
                ProblemClass::Style,
                "missing-dir",
                "Directory does not exist.".to_string(),
            )),
            DirStatus::NotADirectory(kind) => Some((
                ProblemClass::Style,
                "not-a-dir",
                format!("Not a directory ({}).", kind),
            )),
            DirStatus::Directory {
                world_writable: true,
            } => Some((
                ProblemClass::Security,
                "world-writable",
                "Directory is writable by everyone.".to_string(),
            )),
            DirStatus::Directory { .. } => None,
        };
        if let Some((class, rule, message)) = finding {
            tracing::trace!(entry = %er.entry, rule, "directory diagnostic");
            er.findings.push(Finding {
                rule,
                class,
                message,
                fixed: false,
            });
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::run_doctor;
    use crate::pathlist::RawPathList;
    use tempfile::tempdir;

    #[test]
    fn test_stat_dir_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            stat_dir(dir.path().to_str().unwrap()),
            DirStatus::Directory { .. }
        ));
        assert_eq!(stat_dir(file.to_str().unwrap()), DirStatus::NotADirectory("file"));
        assert_eq!(stat_dir(missing.to_str().unwrap()), DirStatus::Missing);
    }

    #[test]
    fn test_check_dirs_appends_once_per_distinct_entry() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone").to_string_lossy().to_string();
        let present = dir.path().to_string_lossy().to_string();
        let raw = RawPathList::from_entries([missing.clone(), present, missing, String::new()]);
        let mut rep = run_doctor(&raw);
        let before = rep.problem_count();
        let added = check_dirs(&mut rep);
        assert!(added >= 1);
        assert_eq!(rep.problem_count(), before + added);
        assert_eq!(rep.entries[0].findings.last().unwrap().rule, "missing-dir");
        // the repeated entry only carries its duplicate finding
        assert!(rep.entries[2]
            .findings
            .iter()
            .all(|f| f.rule != "missing-dir"));
    }

    #[cfg(unix)]
    #[test]
    fn test_world_writable_dir_is_security_problem() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let open = dir.path().join("open");
        fs::create_dir(&open).unwrap();
        fs::set_permissions(&open, fs::Permissions::from_mode(0o777)).unwrap();
        let mut rep = run_doctor(&RawPathList::from_entries([open.to_string_lossy().to_string()]));
        assert_eq!(check_dirs(&mut rep), 1);
        let f = &rep.entries[0].findings[0];
        assert_eq!(f.rule, "world-writable");
        assert_eq!(f.class, ProblemClass::Security);
    }
}
