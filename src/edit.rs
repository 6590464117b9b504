//! Edit sessions with conflict resolution
//!
//! An [`EditSession`] loads the latest revision of a lexeme, applies a change
//! op to a copy and saves it against the revision it started from. When the
//! save reports an edit conflict, the session diffs its base against its
//! own edited copy and replays that diff onto the newer revision. If any
//! step of the replay would overwrite a change made in the meantime, the
//! conflict is reported instead of resolved.
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::change_op::SetLemma;
//! use lexeme_core::edit::{EditConfig, EditSession};
//! use lexeme_core::id::{ItemId, LexemeId};
//! use lexeme_core::model::Lexeme;
//! use lexeme_core::store::InMemoryStore;
//!
//! let id = LexemeId::new("L1").unwrap();
//! let mut lexeme = Lexeme::with_id(id.clone());
//! lexeme.lemmas_mut().set_text("en", "apple");
//! lexeme.set_language(ItemId::new("Q1860").unwrap());
//! lexeme.set_lexical_category(ItemId::new("Q1084").unwrap());
//!
//! let mut store = InMemoryStore::new();
//! let mut session = EditSession::with_config(&mut store, EditConfig::default());
//! session.create(&lexeme).unwrap();
//!
//! let outcome = session.edit(&id, &SetLemma::new("de", "Apfel")).unwrap();
//! assert_eq!(outcome.lexeme.lemmas().text("de"), Some("Apfel"));
//! ```

use crate::change_op::{ChangeOp, ChangeTarget};
use crate::diff::{Differ, LexemeDiffer};
use crate::error::{LexemeError, Result};
use crate::id::LexemeId;
use crate::model::Lexeme;
use crate::patch::{ConflictCheck, LexemePatcher, Patcher};
use crate::store::{LoadOutcome, RevisionId, RevisionSelector, RevisionStore, StoreError, StoreResult};
use crate::summary::Summary;
use serde::{Deserialize, Serialize};

/// Edit session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// How many edit conflicts to fold in before giving up
    pub max_conflict_retries: u32,

    /// Refuse to save lexemes that are not sufficiently initialized
    pub require_initialized: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
            require_initialized: true,
        }
    }
}

impl EditConfig {
    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    pub fn with_require_initialized(mut self, required: bool) -> Self {
        self.require_initialized = required;
        self
    }
}

/// A saved edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub revision: RevisionId,
    pub lexeme: Lexeme,
    pub summary: Summary,

    /// Number of conflicting revisions folded in before the save succeeded
    pub resolved_conflicts: u32,
}

/// Fails unless the lexeme has an id, language, lexical category and lemma
pub fn check_initialized(lexeme: &Lexeme) -> Result<()> {
    lexeme.require_id()?;
    lexeme.language()?;
    lexeme.lexical_category()?;
    if lexeme.lemmas().is_empty() {
        return Err(LexemeError::MinimumContent {
            entity: "lexeme",
            field: "lemma",
        });
    }
    Ok(())
}

/// Applies change ops to stored lexemes
pub struct EditSession<'s, S: RevisionStore + ?Sized> {
    store: &'s mut S,
    config: EditConfig,
    differ: LexemeDiffer,
    patcher: LexemePatcher,
}

impl<'s, S: RevisionStore + ?Sized> EditSession<'s, S> {
    /// Session with the default configuration
    pub fn new(store: &'s mut S) -> Self {
        Self::with_config(store, EditConfig::default())
    }

    pub fn with_config(store: &'s mut S, config: EditConfig) -> Self {
        Self {
            store,
            config,
            differ: LexemeDiffer::new(),
            patcher: LexemePatcher::new(),
        }
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    /// Save a lexeme that does not exist in the store yet
    pub fn create(&mut self, lexeme: &Lexeme) -> StoreResult<RevisionId> {
        if self.config.require_initialized {
            check_initialized(lexeme)?;
        }
        self.store.save(lexeme, &Summary::new(), None)
    }

    /// Apply `op` to the latest revision of `id` and save the result
    pub fn edit(&mut self, id: &LexemeId, op: &dyn ChangeOp) -> StoreResult<EditOutcome> {
        let (mut base, mut base_revision) = self.load_latest(id)?;

        let mut edited = base.clone();
        let mut summary = Summary::new();
        {
            let mut target = ChangeTarget::Lexeme(&mut edited);
            op.validate(&target)?;
            op.apply(&mut target, Some(&mut summary))?;
        }
        if self.config.require_initialized {
            check_initialized(&edited)?;
        }

        let mut resolved_conflicts = 0;
        loop {
            match self.store.save(&edited, &summary, Some(base_revision)) {
                Ok(revision) => {
                    return Ok(EditOutcome {
                        revision,
                        lexeme: edited,
                        summary,
                        resolved_conflicts,
                    })
                }
                Err(StoreError::EditConflict { base: stale, latest })
                    if resolved_conflicts < self.config.max_conflict_retries =>
                {
                    tracing::debug!(
                        target: "lexeme_core",
                        lexeme = %id,
                        ?stale,
                        %latest,
                        attempt = resolved_conflicts + 1,
                        "edit conflict, folding in the newer revision"
                    );
                    let (newer, newer_revision) = self.load_latest(id)?;
                    edited = self.fold_in(&base, &newer, &edited, base_revision, newer_revision)?;
                    base = newer;
                    base_revision = newer_revision;
                    resolved_conflicts += 1;
                }
                Err(err @ StoreError::EditConflict { .. }) => {
                    tracing::warn!(
                        target: "lexeme_core",
                        lexeme = %id,
                        retries = resolved_conflicts,
                        "giving up after repeated edit conflicts"
                    );
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Replay the changes between `base` and `edited` onto `newer`
    fn fold_in(
        &self,
        base: &Lexeme,
        newer: &Lexeme,
        edited: &Lexeme,
        base_revision: RevisionId,
        newer_revision: RevisionId,
    ) -> StoreResult<Lexeme> {
        let ours = self.differ.diff(base, edited);
        let conflict = StoreError::EditConflict {
            base: Some(base_revision),
            latest: newer_revision,
        };

        let conflicts = ours.conflicts(newer);
        if !conflicts.is_empty() {
            tracing::warn!(
                target: "lexeme_core",
                base = %base_revision,
                latest = %newer_revision,
                conflicts = ?conflicts.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "edit overlaps a change made in the meantime"
            );
            return Err(conflict);
        }

        let mut merged = newer.clone();
        match self.patcher.patch(&mut merged, &ours) {
            Ok(()) => Ok(merged),
            Err(err) => {
                tracing::warn!(
                    target: "lexeme_core",
                    error = %err,
                    base = %base_revision,
                    latest = %newer_revision,
                    "edit cannot be replayed onto the newer revision"
                );
                Err(conflict)
            }
        }
    }

    fn load_latest(&self, id: &LexemeId) -> StoreResult<(Lexeme, RevisionId)> {
        match self.store.load(id, RevisionSelector::Latest)? {
            LoadOutcome::Found { lexeme, revision } => Ok((lexeme, revision)),
            LoadOutcome::Redirected { target } => Err(StoreError::Redirected { target }),
        }
    }
}
