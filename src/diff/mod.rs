//! Structural diffs between snapshots
//!
//! A differ compares two snapshots of the same kind of value and produces a
//! diff that the matching patcher in [`crate::patch`] can replay onto a third
//! snapshot. Construction and destruction diffs compare against an empty
//! value.
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::diff::{Diff, Differ, LexemeDiffer};
//! use lexeme_core::id::LexemeId;
//! use lexeme_core::model::{Form, Lexeme, Term, TermList};
//!
//! let mut old = Lexeme::with_id(LexemeId::new("L1").unwrap());
//! old.add_or_update_form(Form::blank(TermList::from_terms([Term::new("en", "foo")]), vec![]))
//!     .unwrap();
//!
//! let mut new = old.clone();
//! let id = new.forms().ids()[0].clone();
//! new.form_mut(&id).unwrap().representations_mut().set_text("en", "bar");
//!
//! let diff = LexemeDiffer::new().diff(&old, &new);
//! assert_eq!(diff.forms.len(), 1);
//! assert!(!diff.is_empty());
//! ```

mod form;
mod lexeme;
mod list;
mod map;
mod op;
mod sense;
mod set;
mod statement;

pub use form::{FormDiff, FormDiffer};
pub use lexeme::{LexemeDiff, LexemeDiffer};
pub use list::ListDiff;
pub use map::{MapDiff, TermListDiff};
pub use op::{diff_value, DiffOp};
pub use sense::{SenseDiff, SenseDiffer};
pub use set::{
    FormSetDiff, FormSetDiffer, SenseSetDiff, SenseSetDiffer, SubEntityChange, SubEntitySetDiff,
    SubEntitySetDiffer,
};
pub use statement::StatementListDiff;

/// Common surface of every diff type
pub trait Diff {
    /// Whether replaying the diff would change nothing
    fn is_empty(&self) -> bool;
}

/// Computes diffs of `T`
pub trait Differ<T> {
    type Diff: Diff;

    /// Changes turning `old` into `new`
    fn diff(&self, old: &T, new: &T) -> Self::Diff;

    /// Changes turning an empty value into `new`
    fn construction_diff(&self, new: &T) -> Self::Diff;

    /// Changes turning `old` into an empty value
    fn destruction_diff(&self, old: &T) -> Self::Diff;
}
