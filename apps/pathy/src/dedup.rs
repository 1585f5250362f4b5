//! Order-preserving duplicate removal.

use std::collections::HashSet;
use std::hash::Hash;

/// Keep the first occurrence of every entry, in original order.
///
/// Comparison is exact; normalize first if `/a/` and `/a` should merge.
pub fn dedup<T: Eq + Hash + Clone>(entries: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<T> = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|e| seen.insert(e.clone()))
        .collect()
}
