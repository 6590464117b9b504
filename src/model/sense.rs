//! Sense: one meaning of a lexeme

use super::statement::StatementList;
use super::sub_entity::SubEntity;
use super::term::TermList;
use crate::id::{IdSlot, SenseId, SenseKind};

/// A sense of a lexeme
///
/// Equality compares glosses and statements, never the id.
#[derive(Debug, Clone, Default)]
pub struct Sense {
    id: IdSlot<SenseId>,
    glosses: TermList,
    statements: StatementList,
}

impl Sense {
    /// Create a sense with an assigned id
    pub fn new(id: SenseId, glosses: TermList, statements: StatementList) -> Self {
        Self::with_slot(IdSlot::Assigned(id), glosses, statements)
    }

    /// Create a sense that has not been attached to a lexeme yet
    pub fn blank(glosses: TermList) -> Self {
        Self::with_slot(IdSlot::Pending, glosses, StatementList::new())
    }

    pub(crate) fn with_slot(id: IdSlot<SenseId>, glosses: TermList, statements: StatementList) -> Self {
        Self {
            id,
            glosses,
            statements,
        }
    }

    /// Glosses, one per language
    pub fn glosses(&self) -> &TermList {
        &self.glosses
    }

    /// Mutable glosses
    pub fn glosses_mut(&mut self) -> &mut TermList {
        &mut self.glosses
    }

    /// Replace all glosses
    pub fn set_glosses(&mut self, glosses: TermList) {
        self.glosses = glosses;
    }
}

impl PartialEq for Sense {
    fn eq(&self, other: &Self) -> bool {
        self.glosses == other.glosses && self.statements == other.statements
    }
}

impl Eq for Sense {}

impl SubEntity for Sense {
    type Kind = SenseKind;

    fn id_slot(&self) -> &IdSlot<SenseId> {
        &self.id
    }

    fn id_slot_mut(&mut self) -> &mut IdSlot<SenseId> {
        &mut self.id
    }

    fn statements(&self) -> &StatementList {
        &self.statements
    }

    fn statements_mut(&mut self) -> &mut StatementList {
        &mut self.statements
    }

    fn has_minimum_content(&self) -> bool {
        !self.glosses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    #[test]
    fn test_equality_ignores_id() {
        let glosses = TermList::from_terms([Term::new("en", "a colour")]);
        let a = Sense::new(SenseId::new("L1-S1").unwrap(), glosses.clone(), StatementList::new());
        let b = Sense::blank(glosses);
        assert_eq!(a, b);
        assert!(b.id().is_none());
        assert_eq!(a.id().map(|id| id.as_str()), Some("L1-S1"));
    }

    #[test]
    fn test_minimum_content() {
        let mut sense = Sense::blank(TermList::from_terms([Term::new("en", "x")]));
        assert!(sense.has_minimum_content());
        sense.glosses_mut().remove("en");
        assert!(!sense.has_minimum_content());
    }
}
