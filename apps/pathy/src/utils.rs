//! Small helpers shared by handlers: the stderr prefix, key matching,
//! prompts and ordering.

use crate::error::{PathyError, Result};
use owo_colors::OwoColorize;
use regex::{Regex, RegexBuilder};
use std::io::{self, BufRead, Write};

fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if stderr_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Case-insensitive regex filter built from command keys.
/// With no keys every value matches.
pub struct KeyMatcher {
    patterns: Vec<Regex>,
}

impl KeyMatcher {
    pub fn new(keys: &[String]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(keys.len());
        for key in keys {
            let re = RegexBuilder::new(key)
                .case_insensitive(true)
                .build()
                .map_err(|source| PathyError::InvalidKey {
                    pattern: key.clone(),
                    source,
                })?;
            patterns.push(re);
        }
        Ok(Self { patterns })
    }

    pub fn matches(&self, s: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(s))
    }
}

/// Ask `<prompt>? [yN]` until the answer is recognizable.
/// An empty answer or end of input means no.
pub fn confirm<R, W>(prompt: &str, input: &mut R, out: &mut W) -> io::Result<bool>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    loop {
        write!(out, "{}? [yN] ", prompt)?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => {}
        }
    }
}

/// Stable sort ignoring ASCII/Unicode case.
pub fn sort_case_insensitive(list: &mut [String]) {
    list.sort_by_cached_key(|s| s.to_lowercase());
}
