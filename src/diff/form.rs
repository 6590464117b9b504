//! Form diffs

use super::list::ListDiff;
use super::map::TermListDiff;
use super::statement::StatementListDiff;
use super::{Diff, Differ};
use crate::id::ItemId;
use crate::model::{Form, SubEntity};

/// Field-level changes of a single form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDiff {
    pub representations: TermListDiff,
    pub grammatical_features: ListDiff<ItemId>,
    pub statements: StatementListDiff,
}

impl Diff for FormDiff {
    fn is_empty(&self) -> bool {
        self.representations.is_empty()
            && self.grammatical_features.is_empty()
            && self.statements.is_empty()
    }
}

/// Computes [`FormDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDiffer;

impl Differ<Form> for FormDiffer {
    type Diff = FormDiff;

    fn diff(&self, old: &Form, new: &Form) -> FormDiff {
        FormDiff {
            representations: TermListDiff::between_terms(
                old.representations(),
                new.representations(),
            ),
            grammatical_features: ListDiff::between(
                old.grammatical_features(),
                new.grammatical_features(),
            ),
            statements: StatementListDiff::between(old.statements(), new.statements()),
        }
    }

    fn construction_diff(&self, new: &Form) -> FormDiff {
        self.diff(&Form::default(), new)
    }

    fn destruction_diff(&self, old: &Form) -> FormDiff {
        self.diff(old, &Form::default())
    }
}
