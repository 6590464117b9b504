//! Statement change ops, valid on a lexeme, form or sense

use super::{record, ChangeOp, ChangeTarget};
use crate::error::{LexemeError, Result};
use crate::model::{Statement, StatementGuid};
use crate::summary::Summary;

/// Add a statement, or replace the one with the same guid in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatement {
    statement: Statement,
}

impl SetStatement {
    pub fn new(statement: Statement) -> Self {
        Self { statement }
    }
}

impl ChangeOp for SetStatement {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        let Some(entity) = target.entity_id() else {
            return Ok(());
        };
        match self.statement.guid.as_str().split_once('$') {
            Some((prefix, _)) if prefix.eq_ignore_ascii_case(&entity) => Ok(()),
            _ => Err(LexemeError::InvalidFormat {
                kind: "statement guid",
                value: self.statement.guid.to_string(),
                reason: "guid does not belong to the target entity",
            }),
        }
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        self.validate(target)?;
        target.statements_mut().set(self.statement.clone());
        record(
            summary,
            "set-statement",
            None,
            [self.statement.main_snak.property().to_string()],
        );
        Ok(())
    }
}

/// Remove a statement by guid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveStatement {
    guid: StatementGuid,
}

impl RemoveStatement {
    pub fn new(guid: StatementGuid) -> Self {
        Self { guid }
    }
}

impl ChangeOp for RemoveStatement {
    fn validate(&self, target: &ChangeTarget<'_>) -> Result<()> {
        if target.statements().contains(&self.guid) {
            Ok(())
        } else {
            Err(LexemeError::NotFound {
                id: self.guid.to_string(),
            })
        }
    }

    fn apply(&self, target: &mut ChangeTarget<'_>, summary: Option<&mut Summary>) -> Result<()> {
        let removed = target
            .statements_mut()
            .remove(&self.guid)
            .ok_or_else(|| LexemeError::NotFound {
                id: self.guid.to_string(),
            })?;
        record(
            summary,
            "remove-statement",
            None,
            [removed.main_snak.property().to_string()],
        );
        Ok(())
    }
}
