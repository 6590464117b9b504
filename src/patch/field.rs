//! Patchers for term lists, grammatical features and statement lists

use super::Patcher;
use crate::diff::{DiffOp, ListDiff, StatementListDiff, TermListDiff};
use crate::error::{LexemeError, Result};
use crate::id::ItemId;
use crate::model::{Form, StatementList, TermList};

/// Applies [`TermListDiff`]s
///
/// Additions and changes write the new text for their language, removals
/// drop the language.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermListPatcher;

impl Patcher<TermList> for TermListPatcher {
    type Diff = TermListDiff;

    fn patch(&self, terms: &mut TermList, diff: &TermListDiff) -> Result<()> {
        for (language, op) in diff.iter() {
            match op {
                DiffOp::Add(text) | DiffOp::Change { new: text, .. } => {
                    terms.set_text(language.as_str(), text.as_str());
                }
                DiffOp::Remove(_) => {
                    terms.remove(language);
                }
            }
        }
        Ok(())
    }
}

/// Applies grammatical feature diffs to a form
///
/// The list stays sorted and duplicate-free, so only additions and removals
/// are meaningful.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureListPatcher;

impl Patcher<Form> for FeatureListPatcher {
    type Diff = ListDiff<ItemId>;

    fn patch(&self, form: &mut Form, diff: &ListDiff<ItemId>) -> Result<()> {
        for op in diff.iter() {
            match op {
                DiffOp::Add(feature) => {
                    form.add_grammatical_feature(feature.clone());
                }
                DiffOp::Remove(feature) => {
                    form.remove_grammatical_feature(feature);
                }
                DiffOp::Change { old, new } => {
                    return Err(LexemeError::patch_shape(format!(
                        "grammatical features cannot be changed in place ({} -> {})",
                        old, new
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Applies [`StatementListDiff`]s
///
/// Removals run first, then in-place changes, then additions in guid order.
/// A recorded order is applied last.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementListPatcher;

impl Patcher<StatementList> for StatementListPatcher {
    type Diff = StatementListDiff;

    fn patch(&self, statements: &mut StatementList, diff: &StatementListDiff) -> Result<()> {
        for (guid, op) in diff.changes.iter() {
            if let DiffOp::Remove(_) = op {
                statements.remove(guid);
            }
        }
        for (_, op) in diff.changes.iter() {
            if let DiffOp::Change { new, .. } = op {
                statements.set(new.clone());
            }
        }
        for (_, op) in diff.changes.iter() {
            if let DiffOp::Add(statement) = op {
                statements.set(statement.clone());
            }
        }
        if let Some(order) = &diff.order {
            statements.reorder(order);
        }
        Ok(())
    }
}
