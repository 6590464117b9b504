//! Keyed map diffs
//!
//! Used for term lists (keyed by language code) and statement lists (keyed
//! by statement guid). Entries are kept sorted by key so the same pair of
//! snapshots always produces the same diff.

use super::op::DiffOp;
use super::Diff;
use crate::model::TermList;
use std::collections::BTreeMap;

/// Per-key changes between two maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDiff<K: Ord, V> {
    ops: BTreeMap<K, DiffOp<V>>,
}

/// Diff of a term list: language code to text
pub type TermListDiff = MapDiff<String, String>;

impl<K: Ord, V> Default for MapDiff<K, V> {
    fn default() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone, V: PartialEq + Clone> MapDiff<K, V> {
    /// Compare two sets of `(key, value)` pairs
    pub fn between<'a>(
        old: impl IntoIterator<Item = (&'a K, &'a V)>,
        new: impl IntoIterator<Item = (&'a K, &'a V)>,
    ) -> Self
    where
        K: 'a,
        V: 'a,
    {
        let old: BTreeMap<&K, &V> = old.into_iter().collect();
        let new: BTreeMap<&K, &V> = new.into_iter().collect();
        let mut ops = BTreeMap::new();

        for (key, old_value) in &old {
            match new.get(key) {
                None => {
                    ops.insert((*key).clone(), DiffOp::Remove((*old_value).clone()));
                }
                Some(new_value) if new_value != old_value => {
                    ops.insert(
                        (*key).clone(),
                        DiffOp::Change {
                            old: (*old_value).clone(),
                            new: (*new_value).clone(),
                        },
                    );
                }
                Some(_) => {}
            }
        }
        for (key, new_value) in &new {
            if !old.contains_key(key) {
                ops.insert((*key).clone(), DiffOp::Add((*new_value).clone()));
            }
        }

        Self { ops }
    }
}

impl<K: Ord, V> MapDiff<K, V> {
    /// Record a change for `key`, replacing any earlier one
    pub fn insert(&mut self, key: K, op: DiffOp<V>) {
        self.ops.insert(key, op);
    }

    /// Change recorded for `key`
    pub fn get(&self, key: &K) -> Option<&DiffOp<V>> {
        self.ops.get(key)
    }

    /// Changes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &DiffOp<V>)> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<K: Ord, V> Diff for MapDiff<K, V> {
    fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl TermListDiff {
    /// Diff two term lists
    pub fn between_terms(old: &TermList, new: &TermList) -> Self {
        Self::between(old.as_map(), new.as_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    #[test]
    fn test_term_list_diff() {
        let old = TermList::from_terms([Term::new("en", "foo"), Term::new("de", "Foo")]);
        let new = TermList::from_terms([Term::new("en", "bar"), Term::new("fr", "fou")]);

        let diff = TermListDiff::between_terms(&old, &new);
        assert_eq!(diff.len(), 3);
        assert_eq!(
            diff.get(&"en".to_string()),
            Some(&DiffOp::Change {
                old: "foo".to_string(),
                new: "bar".to_string()
            })
        );
        assert_eq!(diff.get(&"de".to_string()), Some(&DiffOp::Remove("Foo".to_string())));
        assert_eq!(diff.get(&"fr".to_string()), Some(&DiffOp::Add("fou".to_string())));
    }

    #[test]
    fn test_identical_maps_have_empty_diff() {
        let list = TermList::from_terms([Term::new("en", "foo")]);
        assert!(TermListDiff::between_terms(&list, &list.clone()).is_empty());
    }

    #[test]
    fn test_keys_sorted() {
        let old = TermList::new();
        let new = TermList::from_terms([Term::new("zh", "a"), Term::new("ar", "b")]);
        let diff = TermListDiff::between_terms(&old, &new);
        let keys: Vec<_> = diff.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ar", "zh"]);
    }
}
