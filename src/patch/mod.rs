//! Replaying diffs onto live values
//!
//! Each patcher mirrors a differ in [`crate::diff`]. Patching the older
//! snapshot with `diff(old, new)` reproduces the newer one; patching a
//! different snapshot folds the same changes into it, which is how
//! concurrent edits are reconciled. [`ConflictCheck`] tells beforehand
//! whether such a fold would overwrite anything.

mod conflict;
mod field;
mod lexeme;
mod sub_entity;

pub use conflict::{ConflictCheck, PatchConflict};
pub use field::{FeatureListPatcher, StatementListPatcher, TermListPatcher};
pub use lexeme::LexemePatcher;
pub use sub_entity::{FormPatcher, SensePatcher};

use crate::error::Result;

/// Applies a diff of type `Self::Diff` to a `T`
pub trait Patcher<T> {
    type Diff;

    /// Replay `diff` onto `target`
    fn patch(&self, target: &mut T, diff: &Self::Diff) -> Result<()>;
}
