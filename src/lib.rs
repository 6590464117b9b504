//! Lexeme Core - Lexeme data model with diff/patch conflict resolution
//!
//! Lexemes are stored as whole documents under optimistic concurrency.
//! Concurrent edits are not locked out; they are reconciled by diffing two
//! revisions and replaying the diff onto a third. This crate implements:
//! - The lexeme aggregate with its forms, senses and id counters
//! - Scoped patch access that validates counters before committing
//! - Differs and patchers for every part of the aggregate
//! - Change ops with structured edit summaries
//! - The persisted JSON shape and an in-memory revision store
//!
//! # Examples
//!
//! ```rust
//! use lexeme_core::{Differ, Form, Lexeme, LexemeDiffer, LexemeId, LexemePatcher, Patcher, TermList};
//! use lexeme_core::model::Term;
//!
//! let mut base = Lexeme::with_id(LexemeId::new("L1").unwrap());
//! base.lemmas_mut().set_text("en", "apple");
//!
//! // Someone else adds a form
//! let mut theirs = base.clone();
//! theirs
//!     .add_or_update_form(Form::blank(TermList::from_terms([Term::new("en", "apples")]), vec![]))
//!     .unwrap();
//!
//! // Meanwhile we add a German lemma
//! let mut ours = base.clone();
//! ours.lemmas_mut().set_text("de", "Apfel");
//!
//! // Fold their change into ours
//! let diff = LexemeDiffer::new().diff(&base, &theirs);
//! LexemePatcher::new().patch(&mut ours, &diff).unwrap();
//!
//! assert_eq!(ours.forms().len(), 1);
//! assert_eq!(ours.lemmas().text("de"), Some("Apfel"));
//! ```

pub mod change_op;
pub mod diff;
pub mod edit;
pub mod error;
pub mod id;
pub mod model;
pub mod patch;
pub mod serialize;
pub mod store;
pub mod summary;

// Re-exports for convenience
pub use diff::{Differ, LexemeDiff, LexemeDiffer};
pub use error::{LexemeError, Result};
pub use id::{FormId, ItemId, LexemeId, PropertyId, SenseId};
pub use model::{Form, Lexeme, Sense, TermList};
pub use patch::{LexemePatcher, Patcher};
