//! Id-keyed collections of forms and senses
//!
//! A set has no intrinsic order. The presentation order, used by
//! serialization and by the differ, sorts by the numeric suffix of the id so
//! that the same content always yields the same sequence.
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::id::FormId;
//! use lexeme_core::model::{Form, FormSet, StatementList, TermList};
//!
//! let mut forms = FormSet::new();
//! for id in ["L1-F3", "L1-F1", "L1-F2"] {
//!     let id = FormId::new(id).unwrap();
//!     forms.add(Form::new(id, TermList::new(), vec![], StatementList::new())).unwrap();
//! }
//!
//! let order: Vec<u64> = forms.ids().iter().map(|id| id.number()).collect();
//! assert_eq!(order, vec![1, 2, 3]);
//! assert_eq!(forms.max_suffix_number(), 3);
//! ```

use super::form::Form;
use super::sense::Sense;
use super::sub_entity::SubEntity;
use crate::error::{LexemeError, Result};
use crate::id::{SubEntityId, SubEntityKind};
use std::collections::HashMap;

/// Collection of sub-entities keyed by their id
///
/// Equality holds when both sets have the same ids and every entity is
/// content-equal to its counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct SubEntitySet<E: SubEntity> {
    entries: HashMap<SubEntityId<E::Kind>, E>,
}

/// Forms of a lexeme
pub type FormSet = SubEntitySet<Form>;

/// Senses of a lexeme
pub type SenseSet = SubEntitySet<Sense>;

impl<E: SubEntity> Default for SubEntitySet<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: SubEntity> SubEntitySet<E> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, failing on pending or duplicate ids
    pub fn from_entities(entities: impl IntoIterator<Item = E>) -> Result<Self> {
        let mut set = Self::new();
        for entity in entities {
            set.add(entity)?;
        }
        Ok(set)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entity with the given id
    pub fn get(&self, id: &SubEntityId<E::Kind>) -> Option<&E> {
        self.entries.get(id)
    }

    /// Mutable entity with the given id
    pub fn get_mut(&mut self, id: &SubEntityId<E::Kind>) -> Option<&mut E> {
        self.entries.get_mut(id)
    }

    /// Whether an entity with this id is present
    pub fn contains(&self, id: &SubEntityId<E::Kind>) -> bool {
        self.entries.contains_key(id)
    }

    /// Insert a new entity; fails with `Conflict` if the id is taken
    pub fn add(&mut self, entity: E) -> Result<()> {
        let id = Self::key_of(&entity)?;
        if self.entries.contains_key(&id) {
            return Err(LexemeError::Conflict { id: id.to_string() });
        }
        self.entries.insert(id, entity);
        Ok(())
    }

    /// Remove by id; no-op if absent
    pub fn remove(&mut self, id: &SubEntityId<E::Kind>) -> Option<E> {
        self.entries.remove(id)
    }

    /// Replace the entity with the same id, or insert it
    pub fn put(&mut self, entity: E) -> Result<()> {
        let id = Self::key_of(&entity)?;
        self.entries.remove(&id);
        self.entries.insert(id, entity);
        Ok(())
    }

    /// Entities sorted by numeric suffix
    pub fn to_ordered_vec(&self) -> Vec<&E> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(id, _)| id.number());
        entries.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Entities in no particular order
    pub fn to_unordered_vec(&self) -> Vec<&E> {
        self.entries.values().collect()
    }

    /// Ids sorted by numeric suffix
    pub fn ids(&self) -> Vec<&SubEntityId<E::Kind>> {
        let mut ids: Vec<_> = self.entries.keys().collect();
        ids.sort_by_key(|id| id.number());
        ids
    }

    /// Largest numeric suffix present, 0 when empty
    pub fn max_suffix_number(&self) -> u64 {
        self.entries.keys().map(|id| id.number()).max().unwrap_or(0)
    }

    fn key_of(entity: &E) -> Result<SubEntityId<E::Kind>> {
        entity.id().cloned().ok_or_else(|| {
            LexemeError::invariant(format!(
                "cannot store a {} that has no id",
                <E::Kind as SubEntityKind>::NAME
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FormId;
    use crate::model::{StatementList, Term, TermList};

    fn form(id: &str, text: &str) -> Form {
        Form::new(
            FormId::new(id).unwrap(),
            TermList::from_terms([Term::new("en", text)]),
            vec![],
            StatementList::new(),
        )
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut set = FormSet::new();
        set.add(form("L1-F1", "foo")).unwrap();
        let result = set.add(form("L1-F1", "bar"));
        assert!(matches!(result, Err(LexemeError::Conflict { .. })));

        let id = FormId::new("L1-F1").unwrap();
        assert_eq!(set.get(&id).unwrap().representations().text("en"), Some("foo"));
    }

    #[test]
    fn test_put_replaces() {
        let mut set = FormSet::new();
        set.put(form("L1-F1", "foo")).unwrap();
        set.put(form("L1-F1", "bar")).unwrap();

        assert_eq!(set.len(), 1);
        let id = FormId::new("L1-F1").unwrap();
        assert_eq!(set.get(&id).unwrap().representations().text("en"), Some("bar"));
    }

    #[test]
    fn test_pending_id_rejected() {
        let mut set = FormSet::new();
        let blank = Form::blank(TermList::new(), vec![]);
        assert!(matches!(
            set.add(blank.clone()),
            Err(LexemeError::InvariantViolation(_))
        ));
        assert!(set.put(blank).is_err());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = FormSet::new();
        set.add(form("L1-F1", "foo")).unwrap();
        assert!(set.remove(&FormId::new("L1-F9").unwrap()).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_by_suffix() {
        let mut set = FormSet::new();
        for id in ["L1-F10", "L1-F2", "L1-F1"] {
            set.add(form(id, id)).unwrap();
        }
        let ids: Vec<_> = set.ids().into_iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["L1-F1", "L1-F2", "L1-F10"]);
        assert_eq!(set.to_ordered_vec().len(), 3);
        assert_eq!(set.to_unordered_vec().len(), 3);
    }

    #[test]
    fn test_max_suffix_number() {
        let mut set = FormSet::new();
        assert_eq!(set.max_suffix_number(), 0);
        set.add(form("L1-F4", "a")).unwrap();
        set.add(form("L1-F2", "b")).unwrap();
        assert_eq!(set.max_suffix_number(), 4);

        set.remove(&FormId::new("L1-F4").unwrap());
        assert_eq!(set.max_suffix_number(), 2);
    }

    #[test]
    fn test_equality() {
        let a = FormSet::from_entities([form("L1-F1", "foo"), form("L1-F2", "bar")]).unwrap();
        let b = FormSet::from_entities([form("L1-F2", "bar"), form("L1-F1", "foo")]).unwrap();
        assert_eq!(a, b);

        let c = FormSet::from_entities([form("L1-F1", "foo"), form("L1-F3", "bar")]).unwrap();
        assert_ne!(a, c);

        let d = FormSet::from_entities([form("L1-F1", "foo")]).unwrap();
        assert_ne!(a, d);
    }
}
