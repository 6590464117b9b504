//! Form and sense patchers

use super::field::{FeatureListPatcher, StatementListPatcher, TermListPatcher};
use super::Patcher;
use crate::diff::{FormDiff, SenseDiff};
use crate::error::Result;
use crate::model::{Form, Sense, SubEntity};

/// Applies [`FormDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct FormPatcher;

impl Patcher<Form> for FormPatcher {
    type Diff = FormDiff;

    fn patch(&self, form: &mut Form, diff: &FormDiff) -> Result<()> {
        TermListPatcher.patch(form.representations_mut(), &diff.representations)?;
        FeatureListPatcher.patch(form, &diff.grammatical_features)?;
        StatementListPatcher.patch(form.statements_mut(), &diff.statements)
    }
}

/// Applies [`SenseDiff`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SensePatcher;

impl Patcher<Sense> for SensePatcher {
    type Diff = SenseDiff;

    fn patch(&self, sense: &mut Sense, diff: &SenseDiff) -> Result<()> {
        TermListPatcher.patch(sense.glosses_mut(), &diff.glosses)?;
        StatementListPatcher.patch(sense.statements_mut(), &diff.statements)
    }
}
