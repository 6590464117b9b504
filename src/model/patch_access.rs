//! Scoped mutation handle used while a patch is replayed
//!
//! `Lexeme::patch` hands a `PatchAccess` to its caller. The handle works on
//! deep copies of the lexeme's form and sense sets, so a failing patch never
//! touches live state. Once the closure returns the handle is closed, its
//! final state is validated, and only then is it folded back into the lexeme.

use super::entity_set::{FormSet, SenseSet};
use super::form::Form;
use super::sense::Sense;
use crate::error::{LexemeError, Result};
use std::ops::{Deref, DerefMut};

/// Mutation capability for forms, senses and their counters
#[derive(Debug, Clone)]
pub struct PatchAccess {
    next_form_id: u64,
    forms: FormSet,
    next_sense_id: u64,
    senses: SenseSet,
    closed: bool,
}

impl PatchAccess {
    /// Open a handle seeded with copies of the given state
    pub fn new(next_form_id: u64, forms: &FormSet, next_sense_id: u64, senses: &SenseSet) -> Self {
        Self {
            next_form_id,
            forms: forms.clone(),
            next_sense_id,
            senses: senses.clone(),
            closed: false,
        }
    }

    /// Add a form with an assigned id
    pub fn add_form(&mut self, form: Form) -> Result<()> {
        self.ensure_open()?;
        self.forms.add(form)
    }

    /// Add a sense with an assigned id
    pub fn add_sense(&mut self, sense: Sense) -> Result<()> {
        self.ensure_open()?;
        self.senses.add(sense)
    }

    /// Raise the form counter; lowering it is an invariant violation
    pub fn increase_next_form_id_to(&mut self, number: u64) -> Result<()> {
        self.ensure_open()?;
        if number < self.next_form_id {
            return Err(LexemeError::invariant(format!(
                "cannot decrease next form id from {} to {}",
                self.next_form_id, number
            )));
        }
        self.next_form_id = number;
        Ok(())
    }

    /// Raise the sense counter; lowering it is an invariant violation
    pub fn increase_next_sense_id_to(&mut self, number: u64) -> Result<()> {
        self.ensure_open()?;
        if number < self.next_sense_id {
            return Err(LexemeError::invariant(format!(
                "cannot decrease next sense id from {} to {}",
                self.next_sense_id, number
            )));
        }
        self.next_sense_id = number;
        Ok(())
    }

    /// Make the handle permanently unusable
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn next_form_id(&self) -> u64 {
        self.next_form_id
    }

    pub fn forms(&self) -> &FormSet {
        &self.forms
    }

    pub fn next_sense_id(&self) -> u64 {
        self.next_sense_id
    }

    pub fn senses(&self) -> &SenseSet {
        &self.senses
    }

    pub(crate) fn into_parts(self) -> (u64, FormSet, u64, SenseSet) {
        (self.next_form_id, self.forms, self.next_sense_id, self.senses)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            tracing::error!(target: "lexeme_core", "mutation attempted on a closed patch access");
            return Err(LexemeError::ClosedHandle);
        }
        Ok(())
    }
}

/// Guard that closes the wrapped access on every exit path, unwinding included
pub(crate) struct PatchScope<'a> {
    access: &'a mut PatchAccess,
}

impl<'a> PatchScope<'a> {
    pub(crate) fn open(access: &'a mut PatchAccess) -> Self {
        Self { access }
    }
}

impl Deref for PatchScope<'_> {
    type Target = PatchAccess;

    fn deref(&self) -> &PatchAccess {
        self.access
    }
}

impl DerefMut for PatchScope<'_> {
    fn deref_mut(&mut self) -> &mut PatchAccess {
        self.access
    }
}

impl Drop for PatchScope<'_> {
    fn drop(&mut self) {
        self.access.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{FormId, SenseId};
    use crate::model::{StatementList, Term, TermList};

    fn form(id: &str) -> Form {
        Form::new(
            FormId::new(id).unwrap(),
            TermList::from_terms([Term::new("en", "x")]),
            vec![],
            StatementList::new(),
        )
    }

    #[test]
    fn test_works_on_copies() {
        let forms = FormSet::new();
        let senses = SenseSet::new();
        let mut access = PatchAccess::new(1, &forms, 1, &senses);

        access.increase_next_form_id_to(2).unwrap();
        access.add_form(form("L1-F1")).unwrap();

        assert_eq!(access.forms().len(), 1);
        assert!(forms.is_empty());
    }

    #[test]
    fn test_counters_only_increase() {
        let mut access = PatchAccess::new(3, &FormSet::new(), 5, &SenseSet::new());

        access.increase_next_form_id_to(3).unwrap();
        assert!(matches!(
            access.increase_next_form_id_to(2),
            Err(LexemeError::InvariantViolation(_))
        ));
        assert!(access.increase_next_sense_id_to(4).is_err());

        access.increase_next_sense_id_to(9).unwrap();
        assert_eq!(access.next_form_id(), 3);
        assert_eq!(access.next_sense_id(), 9);
    }

    #[test]
    fn test_closed_handle_rejects_mutation() {
        let mut access = PatchAccess::new(1, &FormSet::new(), 1, &SenseSet::new());
        access.close();

        assert!(access.is_closed());
        assert_eq!(access.add_form(form("L1-F1")), Err(LexemeError::ClosedHandle));
        assert_eq!(
            access.add_sense(Sense::new(
                SenseId::new("L1-S1").unwrap(),
                TermList::new(),
                StatementList::new()
            )),
            Err(LexemeError::ClosedHandle)
        );
        assert_eq!(access.increase_next_form_id_to(5), Err(LexemeError::ClosedHandle));
        assert_eq!(access.increase_next_sense_id_to(5), Err(LexemeError::ClosedHandle));
    }

    #[test]
    fn test_scope_closes_on_drop() {
        let mut access = PatchAccess::new(1, &FormSet::new(), 1, &SenseSet::new());
        {
            let mut scope = PatchScope::open(&mut access);
            scope.increase_next_form_id_to(2).unwrap();
        }
        assert!(access.is_closed());
        assert_eq!(access.next_form_id(), 2);
    }

    #[test]
    fn test_duplicate_add_conflicts() {
        let mut access = PatchAccess::new(2, &FormSet::new(), 1, &SenseSet::new());
        access.add_form(form("L1-F1")).unwrap();
        assert!(matches!(
            access.add_form(form("L1-F1")),
            Err(LexemeError::Conflict { .. })
        ));
    }
}
