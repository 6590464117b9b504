//! Change ops that target the lexeme itself

use super::form::FormEdit;
use super::sense::SenseEdit;
use super::{record, ChangeOp, ChangeTarget};
use crate::error::{LexemeError, Result};
use crate::id::{FormId, ItemId, SenseId};
use crate::model::{require_terms, Form, Sense, TermList};
use crate::summary::Summary;

/// `[id, text...]` in language order
fn id_and_texts(id: &impl ToString, terms: &TermList) -> Vec<String> {
    std::iter::once(id.to_string())
        .chain(terms.iter().map(|(_, text)| text.to_string()))
        .collect()
}

/// Set the lemma for one language; an empty text removes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLemma {
    language: String,
    text: String,
}

impl SetLemma {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

impl ChangeOp for SetLemma {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-lemma", "lexeme")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        if self.text.is_empty() {
            return RemoveLemma::new(self.language.clone()).apply(target, summary);
        }
        let lexeme = target.lexeme("set-lemma")?;
        lexeme.lemmas_mut().set_text(self.language.as_str(), self.text.as_str());
        record(summary, "set-lemma", Some(self.language.as_str()), [self.text.clone()]);
        Ok(())
    }
}

/// Remove the lemma for one language; no-op if absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLemma {
    language: String,
}

impl RemoveLemma {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl ChangeOp for RemoveLemma {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-lemma", "lexeme")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let lexeme = target.lexeme("remove-lemma")?;
        if let Some(removed) = lexeme.lemmas_mut().remove(&self.language) {
            record(summary, "remove-lemma", Some(self.language.as_str()), [removed.value]);
        }
        Ok(())
    }
}

/// Set the language of the lexeme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLanguage {
    language: ItemId,
}

impl SetLanguage {
    pub fn new(language: ItemId) -> Self {
        Self { language }
    }
}

impl ChangeOp for SetLanguage {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-language", "lexeme")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let lexeme = target.lexeme("set-language")?;
        lexeme.set_language(self.language.clone());
        record(summary, "set-language", None, [self.language.to_string()]);
        Ok(())
    }
}

/// Set the lexical category of the lexeme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLexicalCategory {
    category: ItemId,
}

impl SetLexicalCategory {
    pub fn new(category: ItemId) -> Self {
        Self { category }
    }
}

impl ChangeOp for SetLexicalCategory {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-lexical-category", "lexeme")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let lexeme = target.lexeme("set-lexical-category")?;
        lexeme.set_lexical_category(self.category.clone());
        record(summary, "set-lexical-category", None, [self.category.to_string()]);
        Ok(())
    }
}

/// Create a form and attach it under the next free id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    representations: TermList,
    grammatical_features: Vec<ItemId>,
}

impl AddForm {
    pub fn new(representations: TermList, grammatical_features: Vec<ItemId>) -> Self {
        Self {
            representations,
            grammatical_features,
        }
    }
}

impl ChangeOp for AddForm {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("add-form", "lexeme")?;
        require_terms(&self.representations, "form", "representation")?;
        if let Some(lexeme) = target.as_lexeme() {
            lexeme.require_id()?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        self.validate(target)?;
        let lexeme = target.lexeme("add-form")?;
        let form = Form::blank(
            self.representations.clone(),
            self.grammatical_features.clone(),
        );
        let id = lexeme.add_or_update_form(form)?;
        record(
            summary,
            "add-form",
            None,
            id_and_texts(&id, &self.representations),
        );
        Ok(())
    }
}

/// Remove a form by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveForm {
    id: FormId,
}

impl RemoveForm {
    pub fn new(id: FormId) -> Self {
        Self { id }
    }
}

impl ChangeOp for RemoveForm {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-form", "lexeme")?;
        if let Some(lexeme) = target.as_lexeme() {
            lexeme.form(&self.id)?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let lexeme = target.lexeme("remove-form")?;
        let removed = lexeme
            .remove_form(&self.id)
            .ok_or_else(|| LexemeError::NotFound {
                id: self.id.to_string(),
            })?;
        record(
            summary,
            "remove-form",
            None,
            id_and_texts(&self.id, removed.representations()),
        );
        Ok(())
    }
}

/// Create a sense and attach it under the next free id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSense {
    glosses: TermList,
}

impl AddSense {
    pub fn new(glosses: TermList) -> Self {
        Self { glosses }
    }
}

impl ChangeOp for AddSense {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("add-sense", "lexeme")?;
        require_terms(&self.glosses, "sense", "gloss")?;
        if let Some(lexeme) = target.as_lexeme() {
            lexeme.require_id()?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        self.validate(target)?;
        let lexeme = target.lexeme("add-sense")?;
        let id = lexeme.add_or_update_sense(Sense::blank(self.glosses.clone()))?;
        record(summary, "add-sense", None, id_and_texts(&id, &self.glosses));
        Ok(())
    }
}

/// Remove a sense by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveSense {
    id: SenseId,
}

impl RemoveSense {
    pub fn new(id: SenseId) -> Self {
        Self { id }
    }
}

impl ChangeOp for RemoveSense {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-sense", "lexeme")?;
        if let Some(lexeme) = target.as_lexeme() {
            lexeme.sense(&self.id)?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let lexeme = target.lexeme("remove-sense")?;
        let removed = lexeme
            .remove_sense(&self.id)
            .ok_or_else(|| LexemeError::NotFound {
                id: self.id.to_string(),
            })?;
        record(
            summary,
            "remove-sense",
            None,
            id_and_texts(&self.id, removed.glosses()),
        );
        Ok(())
    }
}

/// Apply a [`FormEdit`] to one of the lexeme's forms
#[derive(Debug)]
pub struct EditForm {
    id: FormId,
    edit: FormEdit,
}

impl EditForm {
    pub fn new(id: FormId, edit: FormEdit) -> Self {
        Self { id, edit }
    }
}

impl ChangeOp for EditForm {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("edit-form", "lexeme")?;
        if let Some(lexeme) = target.as_lexeme() {
            let mut form = lexeme.form(&self.id)?.clone();
            self.edit.validate(&ChangeTarget::Form(&mut form))?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let form = target.lexeme("edit-form")?.form_mut(&self.id)?;
        self.edit.apply(&mut ChangeTarget::Form(form), summary)
    }
}

/// Apply a [`SenseEdit`] to one of the lexeme's senses
#[derive(Debug)]
pub struct EditSense {
    id: SenseId,
    edit: SenseEdit,
}

impl EditSense {
    pub fn new(id: SenseId, edit: SenseEdit) -> Self {
        Self { id, edit }
    }
}

impl ChangeOp for EditSense {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("edit-sense", "lexeme")?;
        if let Some(lexeme) = target.as_lexeme() {
            let mut sense = lexeme.sense(&self.id)?.clone();
            self.edit.validate(&ChangeTarget::Sense(&mut sense))?;
        }
        Ok(())
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let sense = target.lexeme("edit-sense")?.sense_mut(&self.id)?;
        self.edit.apply(&mut ChangeTarget::Sense(sense), summary)
    }
}
