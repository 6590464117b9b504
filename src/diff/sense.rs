//! Sense diffs

use super::map::TermListDiff;
use super::statement::StatementListDiff;
use super::{Diff, Differ};
use crate::model::{Sense, SubEntity};

/// Field-level changes of a single sense
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseDiff {
    pub glosses: TermListDiff,
    pub statements: StatementListDiff,
}

impl Diff for SenseDiff {
    fn is_empty(&self) -> bool {
        self.glosses.is_empty() && self.statements.is_empty()
    }
}

/// Computes [`SenseDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SenseDiffer;

impl Differ<Sense> for SenseDiffer {
    type Diff = SenseDiff;

    fn diff(&self, old: &Sense, new: &Sense) -> SenseDiff {
        SenseDiff {
            glosses: TermListDiff::between_terms(old.glosses(), new.glosses()),
            statements: StatementListDiff::between(old.statements(), new.statements()),
        }
    }

    fn construction_diff(&self, new: &Sense) -> SenseDiff {
        self.diff(&Sense::default(), new)
    }

    fn destruction_diff(&self, old: &Sense) -> SenseDiff {
        self.diff(old, &Sense::default())
    }
}
