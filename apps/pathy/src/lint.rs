//! Doctor rules for path lists.
//!
//! Every raw entry is run through `RULES` in table order. A rule reports
//! whether it matched and may propose a replacement value. The fixed list
//! applies at most one net transform per entry:
//! - any matched fix with an empty replacement drops the entry;
//! - otherwise a single matched fix substitutes its replacement;
//! - otherwise the original entry is kept.

use crate::models::{DoctorReport, EntryReport, Finding, ProblemClass};
use crate::pathlist::{RawPathList, DIR_SEPARATOR};
use std::collections::HashSet;

/// What a rule saw on one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub replacement: String,
    pub matched: bool,
    pub fixed: bool,
}

impl RuleOutcome {
    fn clear(entry: &str) -> Self {
        Self {
            replacement: entry.to_string(),
            matched: false,
            fixed: false,
        }
    }

    fn report(entry: &str, matched: bool) -> Self {
        Self {
            replacement: entry.to_string(),
            matched,
            fixed: false,
        }
    }
}

/// Read-only view of the list around the entry being checked.
pub struct EntryContext<'a> {
    pub position: usize,
    pub total: usize,
    /// Entries at strictly earlier positions.
    pub earlier: &'a HashSet<&'a str>,
}

/// A classified predicate over one entry with an optional fix.
pub struct LintRule {
    pub id: &'static str,
    pub class: ProblemClass,
    pub description: &'static str,
    check: fn(&EntryContext<'_>, &str) -> RuleOutcome,
}

impl LintRule {
    pub fn apply(&self, ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
        (self.check)(ctx, entry)
    }
}

pub static RULES: [LintRule; 5] = [
    LintRule {
        id: "duplicate",
        class: ProblemClass::Style,
        description: "Duplicate entry.",
        check: check_duplicate,
    },
    LintRule {
        id: "blank",
        class: ProblemClass::Security,
        description: "Blank entry (interpreted as current directory).",
        check: check_blank,
    },
    LintRule {
        id: "cwd",
        class: ProblemClass::Security,
        description: "Current directory in path.",
        check: check_cwd,
    },
    LintRule {
        id: "cwd-not-last",
        class: ProblemClass::Security,
        description: "Current directory is not the last path entry.",
        check: check_cwd_not_last,
    },
    LintRule {
        id: "relative",
        class: ProblemClass::Security,
        description: "Relative directory in path.",
        check: check_relative,
    },
];

fn check_duplicate(ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
    RuleOutcome::report(entry, ctx.earlier.contains(entry))
}

fn check_blank(_ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
    if entry.is_empty() {
        RuleOutcome {
            replacement: String::new(),
            matched: true,
            fixed: true,
        }
    } else {
        RuleOutcome::clear(entry)
    }
}

fn check_cwd(_ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
    RuleOutcome::report(entry, entry == ".")
}

// Never fires. The blank and `.` rules already flag the current directory
// wherever it appears, so a position-based variant has no agreed meaning yet.
fn check_cwd_not_last(_ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
    RuleOutcome::clear(entry)
}

fn check_relative(_ctx: &EntryContext<'_>, entry: &str) -> RuleOutcome {
    let relative = !entry.is_empty() && entry != "." && !is_absolute(entry);
    RuleOutcome::report(entry, relative)
}

fn is_absolute(entry: &str) -> bool {
    entry.starts_with(DIR_SEPARATOR) || std::path::Path::new(entry).is_absolute()
}

/// Run every rule over every raw entry.
///
/// Duplicates are judged against strictly earlier positions only, so the
/// first occurrence of a repeated entry is never flagged.
pub fn run_doctor(raw: &RawPathList) -> DoctorReport {
    let total = raw.len();
    let mut earlier: HashSet<&str> = HashSet::with_capacity(total);
    let mut entries = Vec::with_capacity(total);
    let mut fixed: Vec<String> = Vec::with_capacity(total);

    for (position, entry) in raw.entries().iter().enumerate() {
        let ctx = EntryContext {
            position,
            total,
            earlier: &earlier,
        };
        let mut findings = Vec::new();
        let mut fixes: Vec<String> = Vec::new();
        for rule in RULES.iter() {
            let outcome = rule.apply(&ctx, entry);
            if !outcome.matched {
                continue;
            }
            if outcome.fixed {
                fixes.push(outcome.replacement);
            }
            findings.push(Finding {
                rule: rule.id,
                class: rule.class,
                message: rule.description.to_string(),
                fixed: outcome.fixed,
            });
        }
        if let Some(kept) = resolve_fixes(entry, &fixes) {
            fixed.push(kept);
        }
        entries.push(EntryReport {
            position,
            entry: entry.clone(),
            findings,
        });
        earlier.insert(entry.as_str());
    }

    let report = DoctorReport {
        entries,
        fixed: RawPathList::from_entries(fixed),
    };
    tracing::debug!(
        entries = total,
        problems = report.problem_count(),
        "doctor pass complete"
    );
    report
}

/// Net transform for one entry given the replacements of matched fixes.
fn resolve_fixes(entry: &str, fixes: &[String]) -> Option<String> {
    if fixes.iter().any(|r| r.is_empty()) {
        return None;
    }
    match fixes {
        [only] => Some(only.clone()),
        _ => Some(entry.to_string()),
    }
}

/// Closing line of a doctor report.
pub fn summary_line(problems: usize) -> String {
    match problems {
        0 => "No problems found".to_string(),
        1 => "1 problem found".to_string(),
        n => format!("{} problems found", n),
    }
}
