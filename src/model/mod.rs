//! Lexeme data model
//!
//! The aggregate (`Lexeme`) exclusively owns its term lists, statements and
//! both sub-entity sets. Copies are deep clones; mutating a copy never
//! affects the original.

mod entity_set;
mod form;
mod lexeme;
mod patch_access;
mod sense;
mod statement;
mod sub_entity;
mod term;

pub use entity_set::{FormSet, SenseSet, SubEntitySet};
pub use form::Form;
pub use lexeme::{Lexeme, LexemeChild, LexemeParts};
pub use patch_access::PatchAccess;
pub use sense::Sense;
pub use statement::{Rank, Snak, Statement, StatementGuid, StatementList};
pub use sub_entity::SubEntity;
pub use term::{Term, TermList};

pub(crate) use term::require_terms;
