//! Path-list codec: splitting a variable value into entries, cleaning single
//! entries lexically, and joining entries back into a value.
//!
//! The raw and clean forms are separate types so they cannot be mixed up:
//! - `RawPathList`: entries exactly as split from the value. Blank and
//!   duplicate entries are preserved; doctor needs to see them.
//! - `CleanPathList`: normalized, deduplicated, no blank entries. Every
//!   mutating command writes one of these.
//!
//! No escaping is performed. An entry that contains the list separator
//! splits into two entries when the serialized value is parsed again.

use crate::dedup::dedup;

/// Separator between entries of a path-like variable on this platform.
pub const LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Separator between components of a single directory path.
pub const DIR_SEPARATOR: char = std::path::MAIN_SEPARATOR;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Entries exactly as split from a variable value.
pub struct RawPathList(Vec<String>);

impl RawPathList {
    /// Split `raw` on `separator`. An empty value yields one blank entry.
    pub fn parse(raw: &str, separator: char) -> Self {
        Self(parse(raw, separator))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// New raw list with `dirs` ahead of the current entries.
    pub fn with_front(&self, dirs: &[String]) -> Self {
        Self(dirs.iter().chain(self.0.iter()).cloned().collect())
    }

    /// New raw list with `dirs` behind the current entries.
    pub fn with_back(&self, dirs: &[String]) -> Self {
        Self(self.0.iter().chain(dirs.iter()).cloned().collect())
    }

    pub fn clean(&self) -> CleanPathList {
        CleanPathList::from_raw(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Normalized, deduplicated entries with blanks removed.
pub struct CleanPathList(Vec<String>);

impl CleanPathList {
    /// Normalize every non-blank entry, then drop later duplicates.
    ///
    /// Blank entries are dropped rather than turned into `.`; the implicit
    /// current directory is never carried into a clean list.
    pub fn from_raw(raw: &RawPathList) -> Self {
        let normalized: Vec<String> = raw
            .entries()
            .iter()
            .filter(|e| !e.is_empty())
            .map(|e| normalize_entry(e))
            .collect();
        Self(dedup(normalized))
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn serialize(&self, separator: char) -> String {
        serialize(&self.0, separator)
    }
}

/// Split a variable value into entries. Mirrors `str::split`, so an empty
/// value produces a single blank entry which callers must handle.
pub fn parse(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator).map(str::to_string).collect()
}

/// Join entries with `separator`.
pub fn serialize<S: AsRef<str>>(entries: &[S], separator: char) -> String {
    let mut out = String::new();
    for (i, e) in entries.iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(e.as_ref());
    }
    out
}

/// Lexically clean one entry using the platform directory separator.
pub fn normalize_entry(entry: &str) -> String {
    normalize_with(entry, DIR_SEPARATOR)
}

/// Lexically clean `entry`: collapse repeated separators, drop `.`
/// segments, resolve `..` against preceding segments, then strip trailing
/// separators. The root itself is never stripped.
pub fn normalize_with(entry: &str, sep: char) -> String {
    let mut cleaned = clean_lexically(entry, sep);
    while cleaned.len() > sep.len_utf8() && cleaned.ends_with(sep) {
        cleaned.pop();
    }
    cleaned
}

fn clean_lexically(entry: &str, sep: char) -> String {
    if entry.is_empty() {
        return ".".to_string();
    }
    let rooted = entry.starts_with(sep);
    let mut parts: Vec<&str> = Vec::new();
    for seg in entry.split(sep) {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                // `..` at the root stays at the root
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(seg),
        }
    }
    let body = parts.join(&sep.to_string());
    if rooted {
        format!("{}{}", sep, body)
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_empty_value_yields_single_blank() {
        assert_eq!(parse("", ':'), vec![String::new()]);
        let raw = RawPathList::parse("", ':');
        assert_eq!(raw.len(), 1);
        assert!(raw.clean().is_empty());
    }

    #[test]
    fn test_parse_keeps_blanks_and_duplicates() {
        let raw = RawPathList::parse("/a::/b:/a", ':');
        assert_eq!(raw.entries(), ["/a", "", "/b", "/a"]);
    }

    #[test]
    fn test_normalize_collapses_and_strips() {
        assert_eq!(normalize_with("/usr//local/./bin/", '/'), "/usr/local/bin");
        assert_eq!(normalize_with("/usr/local/../bin", '/'), "/usr/bin");
        assert_eq!(normalize_with("rel/./dir//", '/'), "rel/dir");
        assert_eq!(normalize_with("../x/../..", '/'), "../..");
        assert_eq!(normalize_with("/..", '/'), "/");
        assert_eq!(normalize_with("./", '/'), ".");
        assert_eq!(normalize_with("", '/'), ".");
    }

    #[test]
    fn test_normalize_keeps_root() {
        assert_eq!(normalize_with("/", '/'), "/");
        assert_eq!(normalize_with("///", '/'), "/");
    }

    #[test]
    fn test_clean_list_normalizes_then_dedups() {
        let raw = RawPathList::from_entries(["/a/", "", "/b", "/a", "/b/."]);
        assert_eq!(raw.clean().entries(), ["/a", "/b"]);
    }

    #[test]
    fn test_put_first_and_last() {
        let raw = RawPathList::from_entries(["/a", "/b"]);
        let c = vec!["/c".to_string()];
        assert_eq!(raw.with_front(&c).clean().entries(), ["/c", "/a", "/b"]);
        assert_eq!(raw.with_back(&c).clean().entries(), ["/a", "/b", "/c"]);
        // moving an existing entry keeps only its new position
        let b = vec!["/b/".to_string()];
        assert_eq!(raw.with_front(&b).clean().entries(), ["/b", "/a"]);
        assert_eq!(
            RawPathList::from_entries(["/a", "/b", "/c"])
                .with_back(&["/a".to_string()])
                .clean()
                .entries(),
            ["/a", "/b", "/c"]
        );
    }

    #[test]
    fn test_serialize_joins() {
        assert_eq!(serialize(&["/a", "/b"], ':'), "/a:/b");
        assert_eq!(serialize::<&str>(&[], ':'), "");
        let clean = RawPathList::parse("/x;/y", ';').clean();
        assert_eq!(clean.serialize(';'), "/x;/y");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "[a-z./]{0,24}") {
            let once = normalize_with(&s, '/');
            prop_assert_eq!(normalize_with(&once, '/'), once);
        }

        #[test]
        fn prop_round_trip_on_well_formed_values(
            entries in prop::collection::vec("[a-z/._-]{1,12}", 1..8)
        ) {
            let value = entries.join(":");
            prop_assert_eq!(serialize(&parse(&value, ':'), ':'), value);
        }
    }
}
