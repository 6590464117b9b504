//! Statement list diffs
//!
//! Statements are matched by guid. Replaying the per-guid changes removes
//! statements, replaces changed ones in place and appends added ones in guid
//! order. When that does not reproduce the newer ordering, the diff also
//! records the newer guid order.

use super::map::MapDiff;
use super::op::DiffOp;
use super::Diff;
use crate::model::{Statement, StatementGuid, StatementList};

/// Changes between two statement lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementListDiff {
    /// Per-guid changes
    pub changes: MapDiff<StatementGuid, Statement>,

    /// Guid order of the newer list, present only when replay alone would
    /// produce a different order
    pub order: Option<Vec<StatementGuid>>,
}

impl StatementListDiff {
    /// Diff two statement lists
    pub fn between(old: &StatementList, new: &StatementList) -> Self {
        let changes = MapDiff::between(
            old.iter().map(|s| (&s.guid, s)),
            new.iter().map(|s| (&s.guid, s)),
        );

        let mut replayed: Vec<&StatementGuid> = old
            .guids()
            .into_iter()
            .filter(|guid| !matches!(changes.get(guid), Some(DiffOp::Remove(_))))
            .collect();
        replayed.extend(
            changes
                .iter()
                .filter(|(_, op)| matches!(op, DiffOp::Add(_)))
                .map(|(guid, _)| guid),
        );

        let target = new.guids();
        let order = (replayed != target)
            .then(|| target.into_iter().cloned().collect());

        Self { changes, order }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.order.is_none()
    }
}

impl Diff for StatementListDiff {
    fn is_empty(&self) -> bool {
        StatementListDiff::is_empty(self)
    }
}
