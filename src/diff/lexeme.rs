//! Whole-lexeme diffs

use super::map::TermListDiff;
use super::op::{diff_value, DiffOp};
use super::set::{FormSetDiff, FormSetDiffer, SenseSetDiff, SenseSetDiffer};
use super::statement::StatementListDiff;
use super::{Diff, Differ};
use crate::id::ItemId;
use crate::model::Lexeme;

/// Structural difference between two snapshots of a lexeme
///
/// The lexeme id is not part of the diff: both snapshots are expected to
/// describe the same lexeme, or the older one is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexemeDiff {
    pub lemmas: TermListDiff,
    pub lexical_category: Option<DiffOp<ItemId>>,
    pub language: Option<DiffOp<ItemId>>,
    pub statements: StatementListDiff,

    /// Only ever a `Change` to a larger value
    pub next_form_id: Option<DiffOp<u64>>,
    pub forms: FormSetDiff,

    /// Only ever a `Change` to a larger value
    pub next_sense_id: Option<DiffOp<u64>>,
    pub senses: SenseSetDiff,
}

impl Diff for LexemeDiff {
    fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
            && self.lexical_category.is_none()
            && self.language.is_none()
            && self.statements.is_empty()
            && self.next_form_id.is_none()
            && self.forms.is_empty()
            && self.next_sense_id.is_none()
            && self.senses.is_empty()
    }
}

/// Computes [`LexemeDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct LexemeDiffer {
    forms: FormSetDiffer,
    senses: SenseSetDiffer,
}

impl LexemeDiffer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Counters are monotonic, so only an increase is representable
fn diff_counter(old: u64, new: u64) -> Option<DiffOp<u64>> {
    (new > old).then_some(DiffOp::Change { old, new })
}

impl Differ<Lexeme> for LexemeDiffer {
    type Diff = LexemeDiff;

    fn diff(&self, old: &Lexeme, new: &Lexeme) -> LexemeDiff {
        LexemeDiff {
            lemmas: TermListDiff::between_terms(old.lemmas(), new.lemmas()),
            lexical_category: diff_value(
                old.lexical_category_if_set(),
                new.lexical_category_if_set(),
            ),
            language: diff_value(old.language_if_set(), new.language_if_set()),
            statements: StatementListDiff::between(old.statements(), new.statements()),
            next_form_id: diff_counter(old.next_form_id(), new.next_form_id()),
            forms: self.forms.diff(old.forms(), new.forms()),
            next_sense_id: diff_counter(old.next_sense_id(), new.next_sense_id()),
            senses: self.senses.diff(old.senses(), new.senses()),
        }
    }

    fn construction_diff(&self, new: &Lexeme) -> LexemeDiff {
        self.diff(&Lexeme::empty(), new)
    }

    fn destruction_diff(&self, old: &Lexeme) -> LexemeDiff {
        self.diff(old, &Lexeme::empty())
    }
}
