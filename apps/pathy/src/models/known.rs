//! Metadata about well-known path-like variables, used for completion hints.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// A recognized variable and what its entries contain.
pub struct KnownVariable {
    pub name: String,
    /// Entries are searched for subdirectories rather than files.
    #[serde(default)]
    pub subdirs: bool,
    /// File extensions relevant to lookups; empty means any name.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl KnownVariable {
    pub fn new(name: &str, subdirs: bool, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            subdirs,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Whether a file name carries one of the relevant extensions.
    pub fn accepts_name(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let lower = name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }
}

/// Built-in table; config entries with the same name replace these.
pub fn builtin() -> Vec<KnownVariable> {
    let path_exts: &[&str] = if cfg!(windows) {
        &[".bat", ".cmd", ".exe"]
    } else {
        &[]
    };
    vec![
        KnownVariable::new("CDPATH", true, &[]),
        KnownVariable::new("GEM_PATH", false, &[".rb"]),
        KnownVariable::new("PATH", false, path_exts),
        KnownVariable::new("PYTHONPATH", true, &[".py", ".pyc"]),
    ]
}

/// Merge `extra` over `base`: same name replaces, new names append.
pub fn merge(base: Vec<KnownVariable>, extra: Vec<KnownVariable>) -> Vec<KnownVariable> {
    let mut out = base;
    for kv in extra {
        match out.iter_mut().find(|k| k.name == kv.name) {
            Some(slot) => *slot = kv,
            None => out.push(kv),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_name_by_extension() {
        let py = KnownVariable::new("PYTHONPATH", true, &[".py", ".pyc"]);
        assert!(py.accepts_name("setup.py"));
        assert!(py.accepts_name("MOD.PYC"));
        assert!(!py.accepts_name("README"));
        let any = KnownVariable::new("CDPATH", true, &[]);
        assert!(any.accepts_name("anything"));
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let merged = merge(
            builtin(),
            vec![
                KnownVariable::new("GEM_PATH", true, &[]),
                KnownVariable::new("PERL5LIB", false, &[".pm"]),
            ],
        );
        let gem = merged.iter().find(|k| k.name == "GEM_PATH").unwrap();
        assert!(gem.subdirs);
        assert!(gem.extensions.is_empty());
        assert_eq!(merged.last().unwrap().name, "PERL5LIB");
        assert_eq!(merged.len(), builtin().len() + 1);
    }
}
