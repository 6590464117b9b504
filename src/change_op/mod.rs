//! Mutation commands
//!
//! A change op performs one focused edit on a lexeme, form or sense and can
//! describe it as a [`Summary`]. Request handlers compose several ops to
//! satisfy one user-facing edit.
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::change_op::{AddForm, ChangeOp, ChangeTarget};
//! use lexeme_core::id::LexemeId;
//! use lexeme_core::model::{Lexeme, Term, TermList};
//! use lexeme_core::summary::Summary;
//!
//! let mut lexeme = Lexeme::with_id(LexemeId::new("L1").unwrap());
//! let op = AddForm::new(TermList::from_terms([Term::new("en", "foo")]), vec![]);
//!
//! let mut summary = Summary::new();
//! op.apply(&mut ChangeTarget::Lexeme(&mut lexeme), Some(&mut summary)).unwrap();
//!
//! assert_eq!(lexeme.next_form_id(), 2);
//! assert_eq!(summary.action(), Some("add-form"));
//! ```

mod form;
mod lexeme;
mod sense;
mod statement;

pub use form::{
    AddGrammaticalFeature, FormEdit, RemoveGrammaticalFeature, RemoveRepresentation,
    SetGrammaticalFeatures, SetRepresentation,
};
pub use lexeme::{
    AddForm, AddSense, EditForm, EditSense, RemoveForm, RemoveLemma, RemoveSense,
    SetLanguage, SetLemma, SetLexicalCategory,
};
pub use sense::{RemoveGloss, SenseEdit, SetGloss};
pub use statement::{RemoveStatement, SetStatement};

use crate::error::{LexemeError, Result};
use crate::model::{Form, Lexeme, Sense, StatementList, SubEntity};
use crate::summary::{Summary, SummaryAggregator};
use std::fmt;

/// Permission a change op requires; enforcement is up to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Edit,
}

/// The value a change op works on
#[derive(Debug)]
pub enum ChangeTarget<'a> {
    Lexeme(&'a mut Lexeme),
    Form(&'a mut Form),
    Sense(&'a mut Sense),
}

impl ChangeTarget<'_> {
    /// Kind of the target, as used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeTarget::Lexeme(_) => "lexeme",
            ChangeTarget::Form(_) => "form",
            ChangeTarget::Sense(_) => "sense",
        }
    }

    /// Serialized id of the target, if it has one
    pub fn entity_id(&self) -> Option<String> {
        match self {
            ChangeTarget::Lexeme(lexeme) => lexeme.id().map(ToString::to_string),
            ChangeTarget::Form(form) => form.id().map(ToString::to_string),
            ChangeTarget::Sense(sense) => sense.id().map(ToString::to_string),
        }
    }

    pub(crate) fn expect_kind(&self, op: &'static str, expected: &'static str) -> Result<()> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(LexemeError::WrongTarget { op, expected })
        }
    }

    pub(crate) fn lexeme(&mut self, op: &'static str) -> Result<&mut Lexeme> {
        match self {
            ChangeTarget::Lexeme(lexeme) => Ok(&mut **lexeme),
            _ => Err(LexemeError::WrongTarget {
                op,
                expected: "lexeme",
            }),
        }
    }

    pub(crate) fn as_lexeme(&self) -> Option<&Lexeme> {
        match self {
            ChangeTarget::Lexeme(lexeme) => Some(&**lexeme),
            _ => None,
        }
    }

    pub(crate) fn form(&mut self, op: &'static str) -> Result<&mut Form> {
        match self {
            ChangeTarget::Form(form) => Ok(&mut **form),
            _ => Err(LexemeError::WrongTarget {
                op,
                expected: "form",
            }),
        }
    }

    pub(crate) fn sense(&mut self, op: &'static str) -> Result<&mut Sense> {
        match self {
            ChangeTarget::Sense(sense) => Ok(&mut **sense),
            _ => Err(LexemeError::WrongTarget {
                op,
                expected: "sense",
            }),
        }
    }

    pub(crate) fn statements(&self) -> &StatementList {
        match self {
            ChangeTarget::Lexeme(lexeme) => lexeme.statements(),
            ChangeTarget::Form(form) => form.statements(),
            ChangeTarget::Sense(sense) => sense.statements(),
        }
    }

    pub(crate) fn statements_mut(&mut self) -> &mut StatementList {
        match self {
            ChangeTarget::Lexeme(lexeme) => lexeme.statements_mut(),
            ChangeTarget::Form(form) => form.statements_mut(),
            ChangeTarget::Sense(sense) => sense.statements_mut(),
        }
    }
}

/// A single, composable mutation
pub trait ChangeOp: fmt::Debug {
    /// Check that the op can be applied to `target` without changing it
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()>;

    /// Apply the op, recording what changed in `summary` if one is given
    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()>;

    /// Permission the op requires
    fn action(&self) -> Action {
        Action::Edit
    }
}

/// Write a fragment into an optional summary
pub(crate) fn record(
    summary: Option<&mut Summary>,
    action: &str,
    language: Option<&str>,
    args: impl IntoIterator<Item = String>,
) {
    if let Some(summary) = summary {
        summary.set(action, language, args);
    }
}

/// Run `ops` in order against `target`, each with its own summary, and merge
/// the summaries with `aggregator`
pub(crate) fn apply_all(
    ops: &[Box<dyn ChangeOp>],
    target: &mut ChangeTarget<'_>,
    aggregator: &SummaryAggregator,
    summary: Option<&mut Summary>,
) -> Result<()> {
    let mut summaries = Vec::with_capacity(ops.len());
    for op in ops {
        let mut own = Summary::new();
        op.apply(target, Some(&mut own))?;
        summaries.push(own);
    }
    if let Some(summary) = summary {
        *summary = aggregator.aggregate(&summaries);
    }
    Ok(())
}

/// Ordered sequence of change ops applied to one target
#[derive(Debug, Default)]
pub struct ChangeOps {
    ops: Vec<Box<dyn ChangeOp>>,
}

impl ChangeOps {
    /// Fallback summary action when the ops did different things
    pub const FALLBACK_ACTION: &'static str = "update-elements";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append an op
    pub fn add(&mut self, op: impl ChangeOp + 'static) -> &mut Self {
        self.ops.push(Box::new(op));
        self
    }

    /// Append an already boxed op
    pub fn add_boxed(&mut self, op: Box<dyn ChangeOp>) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Distinct permissions required by the contained ops
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = Vec::new();
        for action in self.ops.iter().map(|op| op.action()) {
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        actions
    }
}

impl ChangeOp for ChangeOps {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        self.ops.iter().try_for_each(|op| op.validate(target))
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        apply_all(
            &self.ops,
            target,
            &SummaryAggregator::new(Self::FALLBACK_ACTION),
            summary,
        )
    }
}
