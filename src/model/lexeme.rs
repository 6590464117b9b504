//! Lexeme: the aggregate root
//!
//! A lexeme owns its lemmas, language, lexical category, statements, forms
//! and senses, plus two monotonic counters used to mint form and sense ids.
//!
//! # Invariants
//!
//! - `next_form_id > max(forms.len(), forms.max_suffix_number())`
//! - `next_sense_id > max(senses.len(), senses.max_suffix_number())`
//! - Counters never decrease; removed ids are never reused
//! - Every form and sense id names this lexeme as its parent
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::id::LexemeId;
//! use lexeme_core::model::{Form, Lexeme, Term, TermList};
//!
//! let mut lexeme = Lexeme::with_id(LexemeId::new("L1").unwrap());
//! let form = Form::blank(TermList::from_terms([Term::new("en", "foo")]), vec![]);
//!
//! let id = lexeme.add_or_update_form(form).unwrap();
//! assert_eq!(id.as_str(), "L1-F1");
//! assert_eq!(lexeme.next_form_id(), 2);
//! ```

use super::entity_set::{FormSet, SenseSet, SubEntitySet};
use super::form::Form;
use super::patch_access::{PatchAccess, PatchScope};
use super::sense::Sense;
use super::statement::StatementList;
use super::sub_entity::SubEntity;
use super::term::TermList;
use crate::error::{LexemeError, Result};
use crate::id::{FormId, ItemId, LexemeId, SenseId, SubEntityId, SubEntityKind};

/// All fields of a lexeme, used to hydrate one from storage
#[derive(Debug, Clone)]
pub struct LexemeParts {
    pub id: Option<LexemeId>,
    pub lemmas: TermList,
    pub lexical_category: Option<ItemId>,
    pub language: Option<ItemId>,
    pub statements: StatementList,
    pub next_form_id: u64,
    pub forms: FormSet,
    pub next_sense_id: u64,
    pub senses: SenseSet,
}

impl Default for LexemeParts {
    fn default() -> Self {
        Lexeme::empty().into_parts()
    }
}

/// The lexeme aggregate
///
/// Equality is full structural equality, counters included.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    id: Option<LexemeId>,
    lemmas: TermList,
    lexical_category: Option<ItemId>,
    language: Option<ItemId>,
    statements: StatementList,
    next_form_id: u64,
    forms: FormSet,
    next_sense_id: u64,
    senses: SenseSet,
}

impl Default for Lexeme {
    fn default() -> Self {
        Self::empty()
    }
}

impl Lexeme {
    /// Create a lexeme with every optional field absent and counters at 1
    pub fn empty() -> Self {
        Self {
            id: None,
            lemmas: TermList::new(),
            lexical_category: None,
            language: None,
            statements: StatementList::new(),
            next_form_id: 1,
            forms: FormSet::new(),
            next_sense_id: 1,
            senses: SenseSet::new(),
        }
    }

    /// Create an empty lexeme with an id
    pub fn with_id(id: LexemeId) -> Self {
        Self {
            id: Some(id),
            ..Self::empty()
        }
    }

    /// Hydrate a lexeme, validating ids and counters
    pub fn from_parts(parts: LexemeParts) -> Result<Self> {
        let lexeme = Self {
            id: parts.id,
            lemmas: parts.lemmas,
            lexical_category: parts.lexical_category,
            language: parts.language,
            statements: parts.statements,
            next_form_id: parts.next_form_id,
            forms: parts.forms,
            next_sense_id: parts.next_sense_id,
            senses: parts.senses,
        };
        lexeme.assert_parentage(&lexeme.forms)?;
        lexeme.assert_parentage(&lexeme.senses)?;
        lexeme.assert_counters()?;
        Ok(lexeme)
    }

    /// Take the lexeme apart
    pub fn into_parts(self) -> LexemeParts {
        LexemeParts {
            id: self.id,
            lemmas: self.lemmas,
            lexical_category: self.lexical_category,
            language: self.language,
            statements: self.statements,
            next_form_id: self.next_form_id,
            forms: self.forms,
            next_sense_id: self.next_sense_id,
            senses: self.senses,
        }
    }

    pub fn id(&self) -> Option<&LexemeId> {
        self.id.as_ref()
    }

    /// The id, failing if it has not been set
    pub fn require_id(&self) -> Result<&LexemeId> {
        self.id.as_ref().ok_or(LexemeError::UnsetField { field: "id" })
    }

    /// Set the id once; changing an existing id is an invariant violation
    pub fn set_id(&mut self, id: LexemeId) -> Result<()> {
        match &self.id {
            Some(existing) if *existing != id => Err(LexemeError::invariant(format!(
                "cannot change lexeme id {} to {}",
                existing, id
            ))),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub fn lemmas(&self) -> &TermList {
        &self.lemmas
    }

    pub fn lemmas_mut(&mut self) -> &mut TermList {
        &mut self.lemmas
    }

    pub fn set_lemmas(&mut self, lemmas: TermList) {
        self.lemmas = lemmas;
    }

    /// Language of the lexeme; an error while it is unset
    pub fn language(&self) -> Result<&ItemId> {
        self.language
            .as_ref()
            .ok_or(LexemeError::UnsetField { field: "language" })
    }

    /// Language, if it has been set
    pub fn language_if_set(&self) -> Option<&ItemId> {
        self.language.as_ref()
    }

    pub fn set_language(&mut self, language: ItemId) {
        self.language = Some(language);
    }

    pub fn clear_language(&mut self) {
        self.language = None;
    }

    /// Lexical category of the lexeme; an error while it is unset
    pub fn lexical_category(&self) -> Result<&ItemId> {
        self.lexical_category
            .as_ref()
            .ok_or(LexemeError::UnsetField {
                field: "lexical category",
            })
    }

    /// Lexical category, if it has been set
    pub fn lexical_category_if_set(&self) -> Option<&ItemId> {
        self.lexical_category.as_ref()
    }

    pub fn set_lexical_category(&mut self, category: ItemId) {
        self.lexical_category = Some(category);
    }

    pub fn clear_lexical_category(&mut self) {
        self.lexical_category = None;
    }

    pub fn statements(&self) -> &StatementList {
        &self.statements
    }

    pub fn statements_mut(&mut self) -> &mut StatementList {
        &mut self.statements
    }

    pub fn forms(&self) -> &FormSet {
        &self.forms
    }

    pub fn senses(&self) -> &SenseSet {
        &self.senses
    }

    pub fn next_form_id(&self) -> u64 {
        self.next_form_id
    }

    pub fn next_sense_id(&self) -> u64 {
        self.next_sense_id
    }

    /// Whether the lexeme has everything required to be saved
    pub fn is_sufficiently_initialized(&self) -> bool {
        self.id.is_some()
            && self.language.is_some()
            && self.lexical_category.is_some()
            && !self.lemmas.is_empty()
    }

    /// Form by id, failing with `NotFound` if absent
    pub fn form(&self, id: &FormId) -> Result<&Form> {
        self.sub_entity(id)
    }

    pub fn form_mut(&mut self, id: &FormId) -> Result<&mut Form> {
        self.sub_entity_mut(id)
    }

    /// Sense by id, failing with `NotFound` if absent
    pub fn sense(&self, id: &SenseId) -> Result<&Sense> {
        self.sub_entity(id)
    }

    pub fn sense_mut(&mut self, id: &SenseId) -> Result<&mut Sense> {
        self.sub_entity_mut(id)
    }

    /// Attach a form, minting its id if it is still pending
    pub fn add_or_update_form(&mut self, form: Form) -> Result<FormId> {
        self.add_or_update_sub_entity(form)
    }

    /// Attach a sense, minting its id if it is still pending
    pub fn add_or_update_sense(&mut self, sense: Sense) -> Result<SenseId> {
        self.add_or_update_sub_entity(sense)
    }

    /// Remove a form; the counter is left alone so the id is never reused
    pub fn remove_form(&mut self, id: &FormId) -> Option<Form> {
        self.remove_sub_entity(id)
    }

    /// Remove a sense; the counter is left alone so the id is never reused
    pub fn remove_sense(&mut self, id: &SenseId) -> Option<Sense> {
        self.remove_sub_entity(id)
    }

    /// Sub-entity lookup that fails loudly
    pub fn sub_entity<E: LexemeChild>(&self, id: &SubEntityId<E::Kind>) -> Result<&E> {
        E::set_of(self)
            .get(id)
            .ok_or_else(|| LexemeError::NotFound { id: id.to_string() })
    }

    pub fn sub_entity_mut<E: LexemeChild>(&mut self, id: &SubEntityId<E::Kind>) -> Result<&mut E> {
        E::set_of_mut(self)
            .get_mut(id)
            .ok_or_else(|| LexemeError::NotFound { id: id.to_string() })
    }

    /// Attach a form or sense
    ///
    /// A pending entity receives `<lexeme id>-<prefix><next counter>` and the
    /// counter advances. An entity that already carries an id replaces the
    /// entry with that id, or is inserted if there is none.
    pub fn add_or_update_sub_entity<E: LexemeChild>(
        &mut self,
        mut entity: E,
    ) -> Result<SubEntityId<E::Kind>> {
        let lexeme_id = self.id.clone().ok_or_else(|| {
            LexemeError::invariant(format!(
                "cannot attach a {} to a lexeme without an id",
                <E::Kind as SubEntityKind>::NAME
            ))
        })?;

        let id = match entity.id().cloned() {
            Some(id) => {
                if id.parent_id() != &lexeme_id {
                    return Err(LexemeError::invariant(format!(
                        "{} does not belong to lexeme {}",
                        id, lexeme_id
                    )));
                }
                if id.number() >= E::next_id_of(self) {
                    return Err(LexemeError::invariant(format!(
                        "{} was never issued; next {} id is {}",
                        id,
                        <E::Kind as SubEntityKind>::NAME,
                        E::next_id_of(self)
                    )));
                }
                id
            }
            None => {
                let id = SubEntityId::from_parts(&lexeme_id, E::next_id_of(self))?;
                entity.id_slot_mut().assign(id.clone())?;
                E::advance_next_id(self);
                id
            }
        };

        E::set_of_mut(self).put(entity)?;
        self.assert_counters()?;
        Ok(id)
    }

    pub fn remove_sub_entity<E: LexemeChild>(&mut self, id: &SubEntityId<E::Kind>) -> Option<E> {
        E::set_of_mut(self).remove(id)
    }

    /// Apply a structural patch through a scoped [`PatchAccess`]
    ///
    /// The closure works on copies of the counters and sets. The access is
    /// closed on every exit path; if the closure succeeds and the resulting
    /// state satisfies the counter invariants it is committed, otherwise the
    /// lexeme is left untouched.
    pub fn patch<F>(&mut self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut PatchAccess) -> Result<()>,
    {
        let mut access =
            PatchAccess::new(self.next_form_id, &self.forms, self.next_sense_id, &self.senses);
        let outcome = {
            let mut scope = PatchScope::open(&mut access);
            apply(&mut *scope)
        };
        outcome?;

        let (next_form_id, forms, next_sense_id, senses) = access.into_parts();
        check_counter(next_form_id, &forms)?;
        check_counter(next_sense_id, &senses)?;
        self.assert_parentage(&forms)?;
        self.assert_parentage(&senses)?;

        if next_form_id < self.next_form_id || next_sense_id < self.next_sense_id {
            return Err(LexemeError::invariant(format!(
                "patch would decrease counters ({} -> {}, {} -> {})",
                self.next_form_id, next_form_id, self.next_sense_id, next_sense_id
            )));
        }

        self.next_form_id = next_form_id;
        self.forms = forms;
        self.next_sense_id = next_sense_id;
        self.senses = senses;
        Ok(())
    }

    fn assert_counters(&self) -> Result<()> {
        check_counter(self.next_form_id, &self.forms)?;
        check_counter(self.next_sense_id, &self.senses)
    }

    fn assert_parentage<E: SubEntity>(&self, set: &SubEntitySet<E>) -> Result<()> {
        if set.is_empty() {
            return Ok(());
        }
        let Some(lexeme_id) = &self.id else {
            return Err(LexemeError::invariant(format!(
                "a lexeme without an id cannot own a {}",
                <E::Kind as SubEntityKind>::NAME
            )));
        };
        match set.ids().into_iter().find(|id| id.parent_id() != lexeme_id) {
            Some(stray) => Err(LexemeError::invariant(format!(
                "{} does not belong to lexeme {}",
                stray, lexeme_id
            ))),
            None => Ok(()),
        }
    }
}

/// The counter must exceed both the entry count and the largest suffix
fn check_counter<E: SubEntity>(next: u64, set: &SubEntitySet<E>) -> Result<()> {
    let floor = (set.len() as u64).max(set.max_suffix_number());
    if next <= floor {
        return Err(LexemeError::invariant(format!(
            "next {} id {} must exceed {}",
            <E::Kind as SubEntityKind>::NAME,
            next,
            floor
        )));
    }
    Ok(())
}

/// A sub-entity kind a lexeme owns a set and a counter for
pub trait LexemeChild: SubEntity {
    fn set_of(lexeme: &Lexeme) -> &SubEntitySet<Self>;
    fn set_of_mut(lexeme: &mut Lexeme) -> &mut SubEntitySet<Self>;
    fn next_id_of(lexeme: &Lexeme) -> u64;
    fn advance_next_id(lexeme: &mut Lexeme);

    /// Add through a patch access, failing on a taken id
    fn add_to(access: &mut PatchAccess, entity: Self) -> Result<()>;

    /// Raise this kind's counter through a patch access
    fn increase_counter(access: &mut PatchAccess, number: u64) -> Result<()>;
}

impl LexemeChild for Form {
    fn set_of(lexeme: &Lexeme) -> &FormSet {
        &lexeme.forms
    }

    fn set_of_mut(lexeme: &mut Lexeme) -> &mut FormSet {
        &mut lexeme.forms
    }

    fn next_id_of(lexeme: &Lexeme) -> u64 {
        lexeme.next_form_id
    }

    fn advance_next_id(lexeme: &mut Lexeme) {
        lexeme.next_form_id += 1;
    }

    fn add_to(access: &mut PatchAccess, form: Form) -> Result<()> {
        access.add_form(form)
    }

    fn increase_counter(access: &mut PatchAccess, number: u64) -> Result<()> {
        access.increase_next_form_id_to(number)
    }
}

impl LexemeChild for Sense {
    fn set_of(lexeme: &Lexeme) -> &SenseSet {
        &lexeme.senses
    }

    fn set_of_mut(lexeme: &mut Lexeme) -> &mut SenseSet {
        &mut lexeme.senses
    }

    fn next_id_of(lexeme: &Lexeme) -> u64 {
        lexeme.next_sense_id
    }

    fn advance_next_id(lexeme: &mut Lexeme) {
        lexeme.next_sense_id += 1;
    }

    fn add_to(access: &mut PatchAccess, sense: Sense) -> Result<()> {
        access.add_sense(sense)
    }

    fn increase_counter(access: &mut PatchAccess, number: u64) -> Result<()> {
        access.increase_next_sense_id_to(number)
    }
}
