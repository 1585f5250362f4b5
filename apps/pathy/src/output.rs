//! Output rendering for listing, shadow and doctor commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form of doctor
//! includes the flagged entries, a summary and the fixed list.

use crate::config::OutputMode;
use crate::lint::summary_line;
use crate::models::{DoctorReport, ProblemClass};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// One `ls` row: the raw entry and whether it names an existing directory.
pub struct LsRow {
    pub entry: String,
    pub exists: bool,
}

pub fn print_ls(rows: &[LsRow], mode: OutputMode, color: bool, out: &mut dyn Write) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            let items: Vec<_> = rows
                .iter()
                .map(|r| json!({"entry": r.entry, "exists": r.exists}))
                .collect();
            write_json(&JsonVal::Array(items), out)
        }
        OutputMode::Human => {
            for r in rows {
                if r.exists || !color {
                    writeln!(out, "{}", r.entry)?;
                } else {
                    writeln!(out, "{}", r.entry.red())?;
                }
            }
            Ok(())
        }
    }
}

pub fn print_lines(lines: &[String], out: &mut dyn Write) -> io::Result<()> {
    for l in lines {
        writeln!(out, "{}", l)?;
    }
    Ok(())
}

/// Print shadowed names, each followed by its directories in search order.
pub fn print_shadow(
    map: &BTreeMap<String, Vec<String>>,
    mode: OutputMode,
    color: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_json(&json!(map), out),
        OutputMode::Human => {
            for (i, (name, dirs)) in map.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                if color {
                    writeln!(out, "{}", name.bold())?;
                } else {
                    writeln!(out, "{}", name)?;
                }
                for d in dirs {
                    writeln!(out, "* {}", d)?;
                }
            }
            Ok(())
        }
    }
}

/// Human doctor report: a header per flagged entry with its findings,
/// then the summary line.
pub fn doctor_lines(report: &DoctorReport, color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for er in report.flagged() {
        lines.push(format!("Entry [{}]", er.entry));
        for f in &er.findings {
            let tag = format!("[{}]", f.class.as_str());
            let tag = match (color, f.class) {
                (false, _) => tag,
                (true, ProblemClass::Security) => tag.red().bold().to_string(),
                (true, ProblemClass::Style) => tag.yellow().bold().to_string(),
            };
            if f.fixed {
                lines.push(format!("* {} {} [fixed]", tag, f.message));
            } else {
                lines.push(format!("* {} {}", tag, f.message));
            }
        }
    }
    let summary = summary_line(report.problem_count());
    if color {
        lines.push(summary.bold().to_string());
    } else {
        lines.push(summary);
    }
    lines
}

pub fn print_doctor(
    report: &DoctorReport,
    mode: OutputMode,
    color: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_json(&compose_doctor_json(report), out),
        OutputMode::Human => print_lines(&doctor_lines(report, color), out),
    }
}

/// Compose doctor JSON object (pure) for testing purposes.
pub fn compose_doctor_json(report: &DoctorReport) -> JsonVal {
    let flagged: Vec<_> = report.flagged().collect();
    json!({
        "entries": flagged,
        "summary": report.summary(),
        "fixed": report.fixed.entries(),
    })
}

fn write_json(v: &JsonVal, out: &mut dyn Write) -> io::Result<()> {
    let s = serde_json::to_string_pretty(v).map_err(io::Error::other)?;
    writeln!(out, "{}", s)
}
