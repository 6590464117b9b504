//! Revision storage collaborator
//!
//! Lexemes are stored as whole documents under optimistic concurrency: a
//! save names the revision it was based on and fails with
//! [`StoreError::EditConflict`] when someone else saved in the meantime.
//! [`InMemoryStore`] keeps a full history per lexeme and is what tests and
//! demos run against.
//!
//! # Example
//!
//! ```rust
//! use lexeme_core::id::LexemeId;
//! use lexeme_core::model::Lexeme;
//! use lexeme_core::store::{InMemoryStore, LoadOutcome, RevisionSelector, RevisionStore};
//! use lexeme_core::summary::Summary;
//!
//! let id = LexemeId::new("L1").unwrap();
//! let mut store = InMemoryStore::new();
//! let first = store.save(&Lexeme::with_id(id.clone()), &Summary::new(), None).unwrap();
//!
//! match store.load(&id, RevisionSelector::Latest).unwrap() {
//!     LoadOutcome::Found { revision, .. } => assert_eq!(revision, first),
//!     LoadOutcome::Redirected { .. } => unreachable!(),
//! }
//! ```

use crate::error::LexemeError;
use crate::id::LexemeId;
use crate::model::Lexeme;
use crate::summary::Summary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors from a revision store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No lexeme, or no such revision of it
    #[error("not found: {id}")]
    NotFound { id: String },

    /// The lexeme was merged into another one
    #[error("lexeme is a redirect to {target}")]
    Redirected { target: LexemeId },

    /// The base revision is no longer the latest
    #[error("edit conflict: based on {base:?}, latest is {latest}")]
    EditConflict {
        base: Option<RevisionId>,
        latest: RevisionId,
    },

    /// The lexeme itself was rejected
    #[error(transparent)]
    Lexeme(#[from] LexemeError),
}

/// Identifier of a saved revision; increases with every save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(u64);

impl RevisionId {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Which revision to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSelector {
    Latest,
    Revision(RevisionId),
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found { lexeme: Lexeme, revision: RevisionId },
    Redirected { target: LexemeId },
}

/// Metadata of one stored revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionInfo {
    pub id: RevisionId,
    pub summary: Summary,
    pub timestamp: DateTime<Utc>,
}

/// Load and save lexemes by revision
pub trait RevisionStore {
    /// Load a revision of a lexeme
    fn load(&self, id: &LexemeId, selector: RevisionSelector) -> StoreResult<LoadOutcome>;

    /// Save a new revision
    ///
    /// `base` is the revision the edit started from, `None` when creating
    /// the lexeme. Fails with `EditConflict` if `base` is not the latest.
    fn save(
        &mut self,
        lexeme: &Lexeme,
        summary: &Summary,
        base: Option<RevisionId>,
    ) -> StoreResult<RevisionId>;
}

#[derive(Debug, Clone)]
struct StoredRevision {
    info: RevisionInfo,
    lexeme: Lexeme,
}

/// Revision store backed by in-process maps
#[derive(Debug, Default)]
pub struct InMemoryStore {
    histories: HashMap<LexemeId, Vec<StoredRevision>>,
    redirects: HashMap<LexemeId, LexemeId>,
    last_revision: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn `from` into a redirect to `target`
    pub fn redirect(&mut self, from: LexemeId, target: LexemeId) {
        self.redirects.insert(from, target);
    }

    /// Revisions of a lexeme, oldest first
    pub fn history(&self, id: &LexemeId) -> Vec<&RevisionInfo> {
        self.histories
            .get(id)
            .map(|revisions| revisions.iter().map(|r| &r.info).collect())
            .unwrap_or_default()
    }

    /// Latest revision id of a lexeme
    pub fn latest_revision(&self, id: &LexemeId) -> Option<RevisionId> {
        self.histories
            .get(id)
            .and_then(|revisions| revisions.last())
            .map(|r| r.info.id)
    }
}

impl RevisionStore for InMemoryStore {
    fn load(&self, id: &LexemeId, selector: RevisionSelector) -> StoreResult<LoadOutcome> {
        if let Some(target) = self.redirects.get(id) {
            return Ok(LoadOutcome::Redirected {
                target: target.clone(),
            });
        }

        let revisions = self.histories.get(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;
        let stored = match selector {
            RevisionSelector::Latest => revisions.last(),
            RevisionSelector::Revision(revision) => {
                revisions.iter().find(|r| r.info.id == revision)
            }
        };

        stored
            .map(|r| LoadOutcome::Found {
                lexeme: r.lexeme.clone(),
                revision: r.info.id,
            })
            .ok_or_else(|| StoreError::NotFound {
                id: match selector {
                    RevisionSelector::Latest => id.to_string(),
                    RevisionSelector::Revision(revision) => format!("{}@{}", id, revision),
                },
            })
    }

    fn save(
        &mut self,
        lexeme: &Lexeme,
        summary: &Summary,
        base: Option<RevisionId>,
    ) -> StoreResult<RevisionId> {
        let id = lexeme.require_id()?.clone();
        if let Some(target) = self.redirects.get(&id) {
            return Err(StoreError::Redirected {
                target: target.clone(),
            });
        }

        let latest = self.latest_revision(&id);
        match (base, latest) {
            (None, None) => {}
            (Some(base), Some(latest)) if base == latest => {}
            (base, Some(latest)) => return Err(StoreError::EditConflict { base, latest }),
            (Some(base), None) => {
                return Err(StoreError::NotFound {
                    id: format!("{}@{}", id, base),
                })
            }
        }

        self.last_revision += 1;
        let revision = RevisionId(self.last_revision);
        tracing::debug!(target: "lexeme_core", lexeme = %id, %revision, "saved revision");

        self.histories.entry(id).or_default().push(StoredRevision {
            info: RevisionInfo {
                id: revision,
                summary: summary.clone(),
                timestamp: Utc::now(),
            },
            lexeme: lexeme.clone(),
        });
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(n: &str) -> LexemeId {
        LexemeId::new(n).unwrap()
    }

    fn found(outcome: LoadOutcome) -> (Lexeme, RevisionId) {
        match outcome {
            LoadOutcome::Found { lexeme, revision } => (lexeme, revision),
            other => panic!("expected a revision, got {:?}", other),
        }
    }

    #[test]
    fn test_save_and_load() {
        let mut store = InMemoryStore::new();
        let mut lexeme = Lexeme::with_id(l("L1"));
        let r1 = store.save(&lexeme, &Summary::new(), None).unwrap();

        lexeme.lemmas_mut().set_text("en", "apple");
        let r2 = store.save(&lexeme, &Summary::new(), Some(r1)).unwrap();
        assert!(r2 > r1);

        let (latest, revision) = found(store.load(&l("L1"), RevisionSelector::Latest).unwrap());
        assert_eq!(revision, r2);
        assert_eq!(latest, lexeme);

        let (old, _) = found(
            store
                .load(&l("L1"), RevisionSelector::Revision(r1))
                .unwrap(),
        );
        assert!(old.lemmas().is_empty());
        assert_eq!(store.history(&l("L1")).len(), 2);
    }

    #[test]
    fn test_stale_base_conflicts() {
        let mut store = InMemoryStore::new();
        let lexeme = Lexeme::with_id(l("L1"));
        let r1 = store.save(&lexeme, &Summary::new(), None).unwrap();
        let r2 = store.save(&lexeme, &Summary::new(), Some(r1)).unwrap();

        assert_eq!(
            store.save(&lexeme, &Summary::new(), Some(r1)),
            Err(StoreError::EditConflict {
                base: Some(r1),
                latest: r2
            })
        );
        assert!(matches!(
            store.save(&lexeme, &Summary::new(), None),
            Err(StoreError::EditConflict { base: None, .. })
        ));
    }

    #[test]
    fn test_not_found_and_redirects() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.load(&l("L9"), RevisionSelector::Latest),
            Err(StoreError::NotFound { .. })
        ));

        store.redirect(l("L2"), l("L1"));
        assert_eq!(
            store.load(&l("L2"), RevisionSelector::Latest).unwrap(),
            LoadOutcome::Redirected { target: l("L1") }
        );
        assert!(matches!(
            store.save(&Lexeme::with_id(l("L2")), &Summary::new(), None),
            Err(StoreError::Redirected { .. })
        ));
    }

    #[test]
    fn test_save_requires_id() {
        let mut store = InMemoryStore::new();
        assert_eq!(
            store.save(&Lexeme::empty(), &Summary::new(), None),
            Err(StoreError::Lexeme(LexemeError::UnsetField { field: "id" }))
        );
    }
}
