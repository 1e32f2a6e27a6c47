use std::{collections::HashMap, hash::Hash};

use crate::types::CountEntry;

/// Number of entries every ranking is cut to unless asked otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Counts how often each key occurs.
///
/// Entries come back in order of first occurrence, which is what makes the
/// ranking tie-break deterministic.
pub fn count_occurrences<I, K>(items: I) -> Vec<CountEntry<K>>
where
    I: IntoIterator<Item = K>,
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<CountEntry<K>> = Vec::new();

    for key in items {
        match index.get(&key) {
            Some(&pos) => entries[pos].count += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(CountEntry { key, count: 1 });
            }
        }
    }

    entries
}

/// Returns the `n` most frequent keys, highest count first.
///
/// Keys with equal counts keep their first-seen order (`sort_by` is stable).
/// With fewer than `n` distinct keys all of them are returned; empty input
/// gives an empty ranking.
pub fn top_counts<I, K>(items: I, n: usize) -> Vec<CountEntry<K>>
where
    I: IntoIterator<Item = K>,
    K: Eq + Hash + Clone,
{
    let mut entries = count_occurrences(items);
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<'a>(entries: &[CountEntry<&'a str>]) -> Vec<(&'a str, u64)> {
        entries.iter().map(|e| (e.key, e.count)).collect()
    }

    #[test]
    fn counts_keep_first_seen_order() {
        let counted = count_occurrences(["b", "a", "b", "c", "a", "b"]);
        assert_eq!(keys(&counted), vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn ties_are_broken_by_encounter_order() {
        let top = top_counts(["a", "b", "c"], 2);
        assert_eq!(keys(&top), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn higher_counts_overtake_earlier_keys() {
        let top = top_counts(["x", "y", "z", "z", "y", "z"], 10);
        assert_eq!(keys(&top), vec![("z", 3), ("y", 2), ("x", 1)]);
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        let top = top_counts(Vec::<&str>::new(), DEFAULT_TOP_N);
        assert!(top.is_empty());
    }

    #[test]
    fn zero_n_gives_empty_ranking() {
        assert!(top_counts(["a", "a"], 0).is_empty());
    }
}
