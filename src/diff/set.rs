//! Sub-entity set diffs
//!
//! Sets are compared by id. An id only in the newer set becomes an
//! [`SubEntityChange::Added`] entry carrying the whole entity, an id only in
//! the older set becomes [`SubEntityChange::Removed`], and an id in both with
//! unequal content becomes [`SubEntityChange::Changed`] with a field-level
//! diff. Entries are ordered by the numeric suffix of their id.

use super::form::{FormDiff, FormDiffer};
use super::sense::{SenseDiff, SenseDiffer};
use super::{Diff, Differ};
use crate::id::SubEntityId;
use crate::model::{Form, Sense, SubEntity, SubEntitySet};
use std::collections::BTreeMap;

/// One entry of a sub-entity set diff
#[derive(Debug, Clone, PartialEq)]
pub enum SubEntityChange<E: SubEntity, D> {
    /// The entity appeared; `diff` is its construction diff
    Added { entity: E, diff: D },
    /// The entity disappeared; `diff` is its destruction diff
    Removed { id: SubEntityId<E::Kind>, diff: D },
    /// The entity exists on both sides with different content
    Changed { id: SubEntityId<E::Kind>, diff: D },
}

impl<E: SubEntity, D> SubEntityChange<E, D> {
    /// Id the entry refers to
    ///
    /// Entities carried by `Added` entries always have an assigned id, since
    /// they come out of a set.
    pub fn id(&self) -> Option<&SubEntityId<E::Kind>> {
        match self {
            SubEntityChange::Added { entity, .. } => entity.id(),
            SubEntityChange::Removed { id, .. } | SubEntityChange::Changed { id, .. } => Some(id),
        }
    }

    /// Field-level diff of the entry
    pub fn diff(&self) -> &D {
        match self {
            SubEntityChange::Added { diff, .. }
            | SubEntityChange::Removed { diff, .. }
            | SubEntityChange::Changed { diff, .. } => diff,
        }
    }
}

/// Ordered add/remove/change entries for one sub-entity set
#[derive(Debug, Clone, PartialEq)]
pub struct SubEntitySetDiff<E: SubEntity, D> {
    changes: Vec<SubEntityChange<E, D>>,
}

/// Diff of a lexeme's forms
pub type FormSetDiff = SubEntitySetDiff<Form, FormDiff>;

/// Diff of a lexeme's senses
pub type SenseSetDiff = SubEntitySetDiff<Sense, SenseDiff>;

impl<E: SubEntity, D> Default for SubEntitySetDiff<E, D> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<E: SubEntity, D> SubEntitySetDiff<E, D> {
    /// Build a diff from explicit entries
    pub fn from_changes(changes: Vec<SubEntityChange<E, D>>) -> Self {
        Self { changes }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubEntityChange<E, D>> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Entry for the given id, if any
    pub fn get(&self, id: &SubEntityId<E::Kind>) -> Option<&SubEntityChange<E, D>> {
        self.changes.iter().find(|change| change.id() == Some(id))
    }
}

impl<E: SubEntity, D> Diff for SubEntitySetDiff<E, D> {
    fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a, E: SubEntity, D> IntoIterator for &'a SubEntitySetDiff<E, D> {
    type Item = &'a SubEntityChange<E, D>;
    type IntoIter = std::slice::Iter<'a, SubEntityChange<E, D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Keyed-map differ over a sub-entity set, delegating to a per-entity differ
#[derive(Debug, Clone, Copy, Default)]
pub struct SubEntitySetDiffer<D> {
    entity_differ: D,
}

/// Differ for form sets
pub type FormSetDiffer = SubEntitySetDiffer<FormDiffer>;

/// Differ for sense sets
pub type SenseSetDiffer = SubEntitySetDiffer<SenseDiffer>;

impl<D> SubEntitySetDiffer<D> {
    pub fn new(entity_differ: D) -> Self {
        Self { entity_differ }
    }
}

impl<E, D> Differ<SubEntitySet<E>> for SubEntitySetDiffer<D>
where
    E: SubEntity,
    D: Differ<E>,
{
    type Diff = SubEntitySetDiff<E, D::Diff>;

    fn diff(&self, old: &SubEntitySet<E>, new: &SubEntitySet<E>) -> Self::Diff {
        let mut ids: BTreeMap<u64, Vec<&SubEntityId<E::Kind>>> = BTreeMap::new();
        for id in old.ids().into_iter().chain(new.ids()) {
            let bucket = ids.entry(id.number()).or_default();
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }

        let mut changes = Vec::new();
        for id in ids.into_values().flatten() {
            match (old.get(id), new.get(id)) {
                (None, Some(added)) => changes.push(SubEntityChange::Added {
                    entity: added.clone(),
                    diff: self.entity_differ.construction_diff(added),
                }),
                (Some(removed), None) => changes.push(SubEntityChange::Removed {
                    id: id.clone(),
                    diff: self.entity_differ.destruction_diff(removed),
                }),
                (Some(before), Some(after)) if before != after => {
                    changes.push(SubEntityChange::Changed {
                        id: id.clone(),
                        diff: self.entity_differ.diff(before, after),
                    })
                }
                _ => {}
            }
        }

        SubEntitySetDiff { changes }
    }

    fn construction_diff(&self, new: &SubEntitySet<E>) -> Self::Diff {
        self.diff(&SubEntitySet::new(), new)
    }

    fn destruction_diff(&self, old: &SubEntitySet<E>) -> Self::Diff {
        self.diff(old, &SubEntitySet::new())
    }
}
