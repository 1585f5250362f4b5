//! Shared data models for doctor output and variable metadata.

pub mod known;

use crate::pathlist::RawPathList;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Category a doctor finding belongs to.
pub enum ProblemClass {
    Style,
    Security,
}

impl ProblemClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemClass::Style => "style",
            ProblemClass::Security => "security",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single problem found on one entry.
pub struct Finding {
    pub rule: &'static str,
    pub class: ProblemClass,
    pub message: String,
    /// The rule proposed a replacement that went into the fixed list.
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize)]
/// Findings for the entry at `position`, keyed by its raw value.
pub struct EntryReport {
    pub position: usize,
    pub entry: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize)]
/// Aggregated doctor summary used by printers.
pub struct Summary {
    pub problems: usize,
    pub style: usize,
    pub security: usize,
    pub entries: usize,
}

#[derive(Debug, Clone)]
/// Doctor results container. `entries` has one report per raw position.
pub struct DoctorReport {
    pub entries: Vec<EntryReport>,
    pub fixed: RawPathList,
}

impl DoctorReport {
    pub fn problem_count(&self) -> usize {
        self.entries.iter().map(|e| e.findings.len()).sum()
    }

    pub fn summary(&self) -> Summary {
        let mut style = 0usize;
        let mut security = 0usize;
        for f in self.entries.iter().flat_map(|e| e.findings.iter()) {
            match f.class {
                ProblemClass::Style => style += 1,
                ProblemClass::Security => security += 1,
            }
        }
        Summary {
            problems: style + security,
            style,
            security,
            entries: self.entries.len(),
        }
    }

    /// Reports that carry at least one finding, in position order.
    pub fn flagged(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| !e.findings.is_empty())
    }
}
