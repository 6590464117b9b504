//! Set-like list diffs
//!
//! Grammatical features are an ordered, duplicate-free list whose order is
//! derived from the values themselves, so only additions and removals need
//! recording.

use super::op::DiffOp;
use super::Diff;

/// Additions and removals between two duplicate-free lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiff<T> {
    ops: Vec<DiffOp<T>>,
}

impl<T> Default for ListDiff<T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T: PartialEq + Clone> ListDiff<T> {
    /// Removals of `old`-only values followed by additions of `new`-only values
    pub fn between(old: &[T], new: &[T]) -> Self {
        let removals = old
            .iter()
            .filter(|value| !new.contains(value))
            .map(|value| DiffOp::Remove(value.clone()));
        let additions = new
            .iter()
            .filter(|value| !old.contains(value))
            .map(|value| DiffOp::Add(value.clone()));

        Self {
            ops: removals.chain(additions).collect(),
        }
    }
}

impl<T> ListDiff<T> {
    /// Operations in application order
    pub fn iter(&self) -> std::slice::Iter<'_, DiffOp<T>> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append an operation
    pub fn push(&mut self, op: DiffOp<T>) {
        self.ops.push(op);
    }
}

impl<T> Diff for ListDiff<T> {
    fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
