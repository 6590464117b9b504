//! Whole-lexeme patcher
//!
//! Replays a [`LexemeDiff`] in this order: lemmas, lexical category,
//! language, statements, both counters, then the form and sense entries.
//! Counters go first so that added sub-entities always find a counter high
//! enough to cover their ids.

use super::field::{StatementListPatcher, TermListPatcher};
use super::sub_entity::{FormPatcher, SensePatcher};
use super::Patcher;
use crate::diff::{DiffOp, LexemeDiff, SubEntityChange, SubEntitySetDiff};
use crate::error::{LexemeError, Result};
use crate::id::{ItemId, SubEntityKind};
use crate::model::{Form, Lexeme, LexemeChild, Sense};
use std::fmt;

/// Applies [`LexemeDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct LexemePatcher {
    forms: FormPatcher,
    senses: SensePatcher,
}

impl LexemePatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Patcher<Lexeme> for LexemePatcher {
    type Diff = LexemeDiff;

    /// All or nothing: on error the target keeps its previous state
    fn patch(&self, lexeme: &mut Lexeme, diff: &LexemeDiff) -> Result<()> {
        let mut patched = lexeme.clone();
        self.replay(&mut patched, diff)?;
        *lexeme = patched;
        Ok(())
    }
}

impl LexemePatcher {
    fn replay(&self, lexeme: &mut Lexeme, diff: &LexemeDiff) -> Result<()> {
        TermListPatcher.patch(lexeme.lemmas_mut(), &diff.lemmas)?;

        match patch_value(diff.lexical_category.as_ref()) {
            Some(Some(category)) => lexeme.set_lexical_category(category),
            Some(None) => lexeme.clear_lexical_category(),
            None => {}
        }
        match patch_value(diff.language.as_ref()) {
            Some(Some(language)) => lexeme.set_language(language),
            Some(None) => lexeme.clear_language(),
            None => {}
        }

        StatementListPatcher.patch(lexeme.statements_mut(), &diff.statements)?;

        patch_counter::<Form>(lexeme, diff.next_form_id.as_ref())?;
        patch_counter::<Sense>(lexeme, diff.next_sense_id.as_ref())?;

        patch_set(lexeme, &diff.forms, &self.forms)?;
        patch_set(lexeme, &diff.senses, &self.senses)
    }
}

/// Outer `None`: no change. `Some(None)`: clear the field.
fn patch_value(op: Option<&DiffOp<ItemId>>) -> Option<Option<ItemId>> {
    op.map(|op| op.new_value().cloned())
}

fn patch_counter<E: LexemeChild>(lexeme: &mut Lexeme, op: Option<&DiffOp<u64>>) -> Result<()> {
    let Some(op) = op else {
        return Ok(());
    };
    let requested = match op {
        DiffOp::Change { old, new } if new > old => *new,
        other => {
            return Err(LexemeError::patch_shape(format!(
                "next {} id diff must be an increase, got {:?}",
                <E::Kind as SubEntityKind>::NAME,
                other
            )))
        }
    };

    let current = E::next_id_of(lexeme);
    if requested <= current {
        tracing::debug!(
            target: "lexeme_core",
            kind = <E::Kind as SubEntityKind>::NAME,
            current,
            requested,
            "counter already covers the patched value"
        );
        return Ok(());
    }

    tracing::debug!(
        target: "lexeme_core",
        kind = <E::Kind as SubEntityKind>::NAME,
        from = current,
        to = requested,
        "increasing counter"
    );
    lexeme.patch(|access| E::increase_counter(access, requested))
}

fn patch_set<E, P>(
    lexeme: &mut Lexeme,
    diff: &SubEntitySetDiff<E, P::Diff>,
    patcher: &P,
) -> Result<()>
where
    E: LexemeChild,
    P: Patcher<E>,
    P::Diff: fmt::Debug,
{
    let kind = <E::Kind as SubEntityKind>::NAME;
    let mut added = Vec::new();

    for change in diff {
        match change {
            SubEntityChange::Added { entity, .. } => {
                tracing::debug!(
                    target: "lexeme_core",
                    kind,
                    id = ?entity.id(),
                    "adding sub-entity"
                );
                added.push(entity);
            }
            SubEntityChange::Removed { id, .. } => {
                if lexeme.remove_sub_entity::<E>(id).is_none() {
                    tracing::debug!(target: "lexeme_core", kind, %id, "sub-entity already removed");
                } else {
                    tracing::debug!(target: "lexeme_core", kind, %id, "removed sub-entity");
                }
            }
            SubEntityChange::Changed { id, diff } => {
                let lexeme_id = lexeme.id().map(ToString::to_string);
                match lexeme.sub_entity_mut::<E>(id) {
                    Ok(entity) => {
                        tracing::debug!(target: "lexeme_core", kind, %id, "patching sub-entity");
                        patcher.patch(entity, diff)?;
                    }
                    Err(err) => {
                        tracing::error!(
                            target: "lexeme_core",
                            lexeme = ?lexeme_id,
                            kind,
                            %id,
                            ?diff,
                            "changed {} is missing from the lexeme being patched",
                            kind
                        );
                        return Err(err);
                    }
                }
            }
        }
    }

    // One scope for all additions, so the sets are copied once
    if added.is_empty() {
        return Ok(());
    }
    lexeme.patch(|access| {
        added
            .into_iter()
            .try_for_each(|entity| E::add_to(access, entity.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Differ, LexemeDiffer};
    use crate::id::{FormId, LexemeId};
    use crate::model::{Term, TermList};

    fn terms(text: &str) -> TermList {
        TermList::from_terms([Term::new("en", text)])
    }

    fn l1() -> Lexeme {
        let mut lexeme = Lexeme::with_id(LexemeId::new("L1").unwrap());
        lexeme.lemmas_mut().set_text("en", "apple");
        lexeme.set_language(ItemId::new("Q1860").unwrap());
        lexeme.set_lexical_category(ItemId::new("Q1084").unwrap());
        lexeme
    }

    fn round_trip(old: &Lexeme, new: &Lexeme) -> Lexeme {
        let diff = LexemeDiffer::new().diff(old, new);
        let mut target = old.clone();
        LexemePatcher::new().patch(&mut target, &diff).unwrap();
        target
    }

    #[test]
    fn test_round_trip_scalar_fields() {
        let old = l1();
        let mut new = old.clone();
        new.lemmas_mut().set_text("de", "Apfel");
        new.set_language(ItemId::new("Q188").unwrap());
        new.clear_lexical_category();

        assert_eq!(round_trip(&old, &new), new);
    }

    #[test]
    fn test_round_trip_sub_entities() {
        let mut old = l1();
        let f1 = old.add_or_update_form(Form::blank(terms("apple"), vec![])).unwrap();
        let f2 = old.add_or_update_form(Form::blank(terms("apples"), vec![])).unwrap();
        old.add_or_update_sense(Sense::blank(terms("a fruit"))).unwrap();

        let mut new = old.clone();
        new.remove_form(&f1);
        new.form_mut(&f2).unwrap().representations_mut().set_text("en", "apple's");
        new.add_or_update_form(Form::blank(terms("appled"), vec![])).unwrap();
        new.add_or_update_sense(Sense::blank(terms("a tree"))).unwrap();

        let patched = round_trip(&old, &new);
        assert_eq!(patched, new);
        assert_eq!(patched.next_form_id(), 4);
        assert_eq!(patched.next_sense_id(), 3);
    }

    #[test]
    fn test_counter_patch_is_idempotent() {
        let old = l1();
        let mut new = old.clone();
        new.add_or_update_form(Form::blank(terms("apple"), vec![])).unwrap();
        new.remove_form(&FormId::new("L1-F1").unwrap());

        let diff = LexemeDiffer::new().diff(&old, &new);
        assert_eq!(diff.next_form_id, Some(DiffOp::Change { old: 1, new: 2 }));

        let mut target = old.clone();
        LexemePatcher::new().patch(&mut target, &diff).unwrap();
        LexemePatcher::new().patch(&mut target, &diff).unwrap();
        assert_eq!(target.next_form_id(), 2);
    }

    #[test]
    fn test_counter_decrease_is_a_shape_error() {
        let diff = LexemeDiff {
            next_form_id: Some(DiffOp::Change { old: 5, new: 2 }),
            ..LexemeDiff::default()
        };
        let mut target = l1();
        let result = LexemePatcher::new().patch(&mut target, &diff);
        assert!(matches!(result, Err(LexemeError::PatchShape(_))));

        let diff = LexemeDiff {
            next_sense_id: Some(DiffOp::Add(3)),
            ..LexemeDiff::default()
        };
        assert!(matches!(
            LexemePatcher::new().patch(&mut target, &diff),
            Err(LexemeError::PatchShape(_))
        ));
    }

    #[test]
    fn test_changed_entry_for_missing_form_fails_loudly() {
        let mut old = l1();
        let f1 = old.add_or_update_form(Form::blank(terms("apple"), vec![])).unwrap();
        let mut new = old.clone();
        new.form_mut(&f1).unwrap().representations_mut().set_text("en", "Apple");
        let diff = LexemeDiffer::new().diff(&old, &new);

        let mut skewed = old.clone();
        skewed.remove_form(&f1);
        let result = LexemePatcher::new().patch(&mut skewed, &diff);
        assert_eq!(
            result,
            Err(LexemeError::NotFound {
                id: "L1-F1".to_string()
            })
        );
    }

    #[test]
    fn test_added_entry_that_already_exists_conflicts() {
        let old = l1();
        let mut new = old.clone();
        new.add_or_update_form(Form::blank(terms("apple"), vec![])).unwrap();
        let diff = LexemeDiffer::new().diff(&old, &new);

        let mut target = new.clone();
        assert!(matches!(
            LexemePatcher::new().patch(&mut target, &diff),
            Err(LexemeError::Conflict { .. })
        ));
    }

    #[test]
    fn test_construction_diff_builds_lexeme() {
        let mut lexeme = l1();
        lexeme.add_or_update_form(Form::blank(terms("apple"), vec![])).unwrap();
        lexeme.add_or_update_sense(Sense::blank(terms("a fruit"))).unwrap();

        let diff = LexemeDiffer::new().construction_diff(&lexeme);
        let mut target = Lexeme::with_id(LexemeId::new("L1").unwrap());
        LexemePatcher::new().patch(&mut target, &diff).unwrap();
        assert_eq!(target, lexeme);
    }

    #[test]
    fn test_added_entries_land_together() {
        let old = l1();
        let mut new = old.clone();
        for text in ["apples", "apple's", "apples'"] {
            new.add_or_update_form(Form::blank(terms(text), vec![])).unwrap();
        }
        let diff = LexemeDiffer::new().diff(&old, &new);
        assert_eq!(round_trip(&old, &new), new);

        // One taken id rejects the whole batch
        let mut target = old.clone();
        target
            .patch(|access| {
                access.increase_next_form_id_to(3)?;
                access.add_form(Form::new(
                    FormId::new("L1-F2").unwrap(),
                    terms("other"),
                    vec![],
                    crate::model::StatementList::new(),
                ))
            })
            .unwrap();
        let before = target.clone();
        assert!(matches!(
            LexemePatcher::new().patch(&mut target, &diff),
            Err(LexemeError::Conflict { .. })
        ));
        assert_eq!(target, before);
    }
}
