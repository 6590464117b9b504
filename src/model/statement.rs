//! Statements and statement lists
//!
//! A statement pairs a main snak with a rank and is identified by a guid of
//! the form `<entity id>$<uuid>`. Statement lists keep insertion order and
//! guarantee unique guids.

use crate::error::{LexemeError, Result};
use crate::id::PropertyId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Globally unique statement identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementGuid(String);

impl StatementGuid {
    /// Wrap an existing guid
    pub fn new(guid: impl Into<String>) -> Self {
        Self(guid.into())
    }

    /// Mint a fresh guid for a statement on `entity`
    pub fn generate(entity: &str) -> Self {
        Self(format!("{}${}", entity, Uuid::new_v4()))
    }

    /// Guid as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatementGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statement rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

/// Main claim of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "snaktype", rename_all = "lowercase")]
pub enum Snak {
    /// The property has this value
    Value {
        property: PropertyId,
        datavalue: serde_json::Value,
    },
    /// The property has some unknown value
    SomeValue { property: PropertyId },
    /// The property has no value
    NoValue { property: PropertyId },
}

impl Snak {
    /// Property the snak is about
    pub fn property(&self) -> &PropertyId {
        match self {
            Snak::Value { property, .. }
            | Snak::SomeValue { property }
            | Snak::NoValue { property } => property,
        }
    }
}

/// A single statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "id")]
    pub guid: StatementGuid,

    #[serde(rename = "mainsnak")]
    pub main_snak: Snak,

    #[serde(default)]
    pub rank: Rank,
}

impl Statement {
    /// Create a normal-rank statement
    pub fn new(guid: StatementGuid, main_snak: Snak) -> Self {
        Self {
            guid,
            main_snak,
            rank: Rank::Normal,
        }
    }

    /// Same statement with a different rank
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }
}

/// Ordered list of statements with unique guids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Statement>", into = "Vec<Statement>")]
pub struct StatementList {
    statements: Vec<Statement>,
}

impl StatementList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement; fails with `Conflict` if its guid is taken
    pub fn add(&mut self, statement: Statement) -> Result<()> {
        if self.contains(&statement.guid) {
            return Err(LexemeError::Conflict {
                id: statement.guid.to_string(),
            });
        }
        self.statements.push(statement);
        Ok(())
    }

    /// Replace the statement with the same guid in place, or append it
    pub fn set(&mut self, statement: Statement) {
        match self.position(&statement.guid) {
            Some(index) => self.statements[index] = statement,
            None => self.statements.push(statement),
        }
    }

    /// Replace an existing statement; fails with `NotFound` otherwise
    pub fn replace(&mut self, statement: Statement) -> Result<()> {
        let index = self
            .position(&statement.guid)
            .ok_or_else(|| LexemeError::NotFound {
                id: statement.guid.to_string(),
            })?;
        self.statements[index] = statement;
        Ok(())
    }

    /// Remove by guid; no-op if absent
    pub fn remove(&mut self, guid: &StatementGuid) -> Option<Statement> {
        self.position(guid).map(|index| self.statements.remove(index))
    }

    /// Statement with the given guid
    pub fn get(&self, guid: &StatementGuid) -> Option<&Statement> {
        self.statements.iter().find(|s| &s.guid == guid)
    }

    /// Whether a statement with this guid exists
    pub fn contains(&self, guid: &StatementGuid) -> bool {
        self.position(guid).is_some()
    }

    /// Statements whose main snak uses `property`
    pub fn by_property<'a>(
        &'a self,
        property: &'a PropertyId,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements
            .iter()
            .filter(move |s| s.main_snak.property() == property)
    }

    /// Guids in list order
    pub fn guids(&self) -> Vec<&StatementGuid> {
        self.statements.iter().map(|s| &s.guid).collect()
    }

    /// Reorder to follow `order`; guids not mentioned keep their relative
    /// order after the mentioned ones
    pub fn reorder(&mut self, order: &[StatementGuid]) {
        let rank: HashMap<&StatementGuid, usize> =
            order.iter().enumerate().map(|(i, g)| (g, i)).collect();
        let mut indexed: Vec<(usize, Statement)> = self
            .statements
            .drain(..)
            .map(|s| (rank.get(&s.guid).copied().unwrap_or(usize::MAX), s))
            .collect();
        // sort_by_key is stable, so unknown guids keep their relative order
        indexed.sort_by_key(|(r, _)| *r);
        self.statements = indexed.into_iter().map(|(_, s)| s).collect();
    }

    /// Iterate in list order
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    fn position(&self, guid: &StatementGuid) -> Option<usize> {
        self.statements.iter().position(|s| &s.guid == guid)
    }
}

impl TryFrom<Vec<Statement>> for StatementList {
    type Error = LexemeError;

    fn try_from(statements: Vec<Statement>) -> Result<Self> {
        let mut seen = HashSet::new();
        for statement in &statements {
            if !seen.insert(&statement.guid) {
                return Err(LexemeError::Conflict {
                    id: statement.guid.to_string(),
                });
            }
        }
        Ok(Self { statements })
    }
}

impl From<StatementList> for Vec<Statement> {
    fn from(list: StatementList) -> Self {
        list.statements
    }
}

impl<'a> IntoIterator for &'a StatementList {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
