//! Change ops that target a single form

use super::{apply_all, record, ChangeOp, ChangeTarget};
use crate::error::Result;
use crate::id::ItemId;
use crate::model::require_terms;
use crate::summary::{Summary, SummaryAggregator};

/// Set the representation for one language; an empty text removes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRepresentation {
    language: String,
    text: String,
}

impl SetRepresentation {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

impl ChangeOp for SetRepresentation {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-form-representations", "form")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        if self.text.is_empty() {
            return RemoveRepresentation::new(self.language.clone()).apply(target, summary);
        }
        let form = target.form("set-form-representations")?;
        form.representations_mut()
            .set_text(self.language.as_str(), self.text.as_str());
        record(
            summary,
            "set-form-representations",
            Some(self.language.as_str()),
            [self.text.clone()],
        );
        Ok(())
    }
}

/// Remove the representation for one language; no-op if absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRepresentation {
    language: String,
}

impl RemoveRepresentation {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl ChangeOp for RemoveRepresentation {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-form-representations", "form")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let form = target.form("remove-form-representations")?;
        if let Some(removed) = form.representations_mut().remove(&self.language) {
            record(
                summary,
                "remove-form-representations",
                Some(self.language.as_str()),
                [removed.value],
            );
        }
        Ok(())
    }
}

/// Replace all grammatical features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGrammaticalFeatures {
    features: Vec<ItemId>,
}

impl SetGrammaticalFeatures {
    pub fn new(features: Vec<ItemId>) -> Self {
        Self { features }
    }
}

impl ChangeOp for SetGrammaticalFeatures {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("set-form-grammatical-features", "form")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let form = target.form("set-form-grammatical-features")?;
        form.set_grammatical_features(self.features.clone());
        let args = form.grammatical_features().iter().map(ToString::to_string);
        record(summary, "set-form-grammatical-features", None, args);
        Ok(())
    }
}

/// Add one grammatical feature; no-op if already present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddGrammaticalFeature {
    feature: ItemId,
}

impl AddGrammaticalFeature {
    pub fn new(feature: ItemId) -> Self {
        Self { feature }
    }
}

impl ChangeOp for AddGrammaticalFeature {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("add-form-grammatical-features", "form")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let form = target.form("add-form-grammatical-features")?;
        if form.add_grammatical_feature(self.feature.clone()) {
            record(
                summary,
                "add-form-grammatical-features",
                None,
                [self.feature.to_string()],
            );
        }
        Ok(())
    }
}

/// Remove one grammatical feature; no-op if absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveGrammaticalFeature {
    feature: ItemId,
}

impl RemoveGrammaticalFeature {
    pub fn new(feature: ItemId) -> Self {
        Self { feature }
    }
}

impl ChangeOp for RemoveGrammaticalFeature {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("remove-form-grammatical-features", "form")
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let form = target.form("remove-form-grammatical-features")?;
        if form.remove_grammatical_feature(&self.feature) {
            record(
                summary,
                "remove-form-grammatical-features",
                None,
                [self.feature.to_string()],
            );
        }
        Ok(())
    }
}

/// Several edits to one form that must leave it with a representation
#[derive(Debug, Default)]
pub struct FormEdit {
    ops: Vec<Box<dyn ChangeOp>>,
}

impl FormEdit {
    /// Summary action used when the edits did different things
    pub const FALLBACK_ACTION: &'static str = "update-form-elements";

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

impl ChangeOp for FormEdit {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        target.expect_kind("update-form-elements", "form")?;
        self.ops.iter().try_for_each(|op| op.validate(target))
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        target.form(Self::FALLBACK_ACTION)?;
        apply_all(
            &self.ops,
            target,
            &SummaryAggregator::new(Self::FALLBACK_ACTION),
            summary,
        )?;
        let form = target.form(Self::FALLBACK_ACTION)?;
        require_terms(form.representations(), "form", "representation")
    }
}
