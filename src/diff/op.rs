//! Atomic diff operations

/// Change to a single value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp<T> {
    /// The value appeared
    Add(T),
    /// The value disappeared
    Remove(T),
    /// The value was replaced
    Change { old: T, new: T },
}

impl<T> DiffOp<T> {
    /// Value after the change, if any
    pub fn new_value(&self) -> Option<&T> {
        match self {
            DiffOp::Add(new) | DiffOp::Change { new, .. } => Some(new),
            DiffOp::Remove(_) => None,
        }
    }

    /// Value before the change, if any
    pub fn old_value(&self) -> Option<&T> {
        match self {
            DiffOp::Remove(old) | DiffOp::Change { old, .. } => Some(old),
            DiffOp::Add(_) => None,
        }
    }
}

/// Diff of an optional single value; `None` when nothing changed
pub fn diff_value<T: PartialEq + Clone>(old: Option<&T>, new: Option<&T>) -> Option<DiffOp<T>> {
    match (old, new) {
        (None, None) => None,
        (None, Some(new)) => Some(DiffOp::Add(new.clone())),
        (Some(old), None) => Some(DiffOp::Remove(old.clone())),
        (Some(old), Some(new)) if old == new => None,
        (Some(old), Some(new)) => Some(DiffOp::Change {
            old: old.clone(),
            new: new.clone(),
        }),
    }
}
