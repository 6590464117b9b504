//! Form: one inflected or written variant of a lexeme

use super::statement::StatementList;
use super::sub_entity::SubEntity;
use super::term::TermList;
use crate::id::{FormId, FormKind, IdSlot, ItemId};

/// A form of a lexeme
///
/// Grammatical features are kept sorted and free of duplicates. Equality
/// compares representations, features and statements, never the id.
#[derive(Debug, Clone, Default)]
pub struct Form {
    id: IdSlot<FormId>,
    representations: TermList,
    grammatical_features: Vec<ItemId>,
    statements: StatementList,
}

impl Form {
    /// Create a form with an assigned id
    pub fn new(
        id: FormId,
        representations: TermList,
        grammatical_features: Vec<ItemId>,
        statements: StatementList,
    ) -> Self {
        Self::with_slot(
            IdSlot::Assigned(id),
            representations,
            grammatical_features,
            statements,
        )
    }

    /// Create a form that has not been attached to a lexeme yet
    pub fn blank(representations: TermList, grammatical_features: Vec<ItemId>) -> Self {
        Self::with_slot(
            IdSlot::Pending,
            representations,
            grammatical_features,
            StatementList::new(),
        )
    }

    pub(crate) fn with_slot(
        id: IdSlot<FormId>,
        representations: TermList,
        grammatical_features: Vec<ItemId>,
        statements: StatementList,
    ) -> Self {
        let mut form = Self {
            id,
            representations,
            grammatical_features: Vec::new(),
            statements,
        };
        form.set_grammatical_features(grammatical_features);
        form
    }

    /// Representations, one per language
    pub fn representations(&self) -> &TermList {
        &self.representations
    }

    /// Mutable representations
    pub fn representations_mut(&mut self) -> &mut TermList {
        &mut self.representations
    }

    /// Replace all representations
    pub fn set_representations(&mut self, representations: TermList) {
        self.representations = representations;
    }

    /// Grammatical features, sorted by item number
    pub fn grammatical_features(&self) -> &[ItemId] {
        &self.grammatical_features
    }

    /// Replace all grammatical features (sorted and deduplicated)
    pub fn set_grammatical_features(&mut self, mut features: Vec<ItemId>) {
        features.sort();
        features.dedup();
        self.grammatical_features = features;
    }

    /// Add a feature; returns false if it was already present
    pub fn add_grammatical_feature(&mut self, feature: ItemId) -> bool {
        match self.grammatical_features.binary_search(&feature) {
            Ok(_) => false,
            Err(index) => {
                self.grammatical_features.insert(index, feature);
                true
            }
        }
    }

    /// Remove a feature; returns false if it was absent
    pub fn remove_grammatical_feature(&mut self, feature: &ItemId) -> bool {
        match self.grammatical_features.binary_search(feature) {
            Ok(index) => {
                self.grammatical_features.remove(index);
                true
            }
            Err(_) => false,
        }
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        self.representations == other.representations
            && self.grammatical_features == other.grammatical_features
            && self.statements == other.statements
    }
}

impl Eq for Form {}

impl SubEntity for Form {
    type Kind = FormKind;

    fn id_slot(&self) -> &IdSlot<FormId> {
        &self.id
    }

    fn id_slot_mut(&mut self) -> &mut IdSlot<FormId> {
        &mut self.id
    }

    fn statements(&self) -> &StatementList {
        &self.statements
    }

    fn statements_mut(&mut self) -> &mut StatementList {
        &mut self.statements
    }

    fn has_minimum_content(&self) -> bool {
        !self.representations.is_empty()
    }
}
