//! Change ops that target a single sense

use super::{apply_all, record, ChangeOp, ChangeTarget};
use crate::error::Result;
use crate::model::require_terms;
use crate::summary::{Summary, SummaryAggregator};

/// Set the gloss for one language; an empty text removes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGloss {
    language: String,
    text: String,
}

impl SetGloss {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

impl ChangeOp for SetGloss {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-sense-glosses", "sense")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        if self.text.is_empty() {
            return RemoveGloss::new(self.language.clone()).apply(target, summary);
        }
        let sense = target.sense("set-sense-glosses")?;
        sense
            .glosses_mut()
            .set_text(self.language.as_str(), self.text.as_str());
        record(
            summary,
            "set-sense-glosses",
            Some(self.language.as_str()),
            [self.text.clone()],
        );
        Ok(())
    }
}

/// Remove the gloss for one language; no-op if absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveGloss {
    language: String,
}

impl RemoveGloss {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl ChangeOp for RemoveGloss {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-sense-glosses", "sense")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let sense = target.sense("remove-sense-glosses")?;
        if let Some(removed) = sense.glosses_mut().remove(&self.language) {
            record(
                summary,
                "remove-sense-glosses",
                Some(self.language.as_str()),
                [removed.value],
            );
        }
        Ok(())
    }
}

/// Several edits to one sense that must leave it with a gloss
#[derive(Debug, Default)]
pub struct SenseEdit {
    ops: Vec<Box<dyn ChangeOp>>,
}

impl SenseEdit {
    /// Summary action used when the edits did different things
    pub const FALLBACK_ACTION: &'static str = "update-sense-elements";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, op: impl ChangeOp + 'static) -> &mut Self {
        self.ops.push(Box::new(op));
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl ChangeOp for SenseEdit {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("update-sense-elements", "sense")?;
        self.ops.iter().try_for_each(|op| op.validate(target))
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        target.sense(Self::FALLBACK_ACTION)?;
        apply_all(
            &self.ops,
            target,
            &SummaryAggregator::new(Self::FALLBACK_ACTION),
            summary,
        )?;
        let sense = target.sense(Self::FALLBACK_ACTION)?;
        require_terms(sense.glosses(), "sense", "gloss")
    }
}
