//! Identifiers of forms and senses
//!
//! A sub-entity id is `<lexeme id>-<prefix><number>` (`L1-F2`, `L1-S3`).
//! The owning lexeme and the bare suffix are derived from the serialization
//! itself; no lookup is involved.

use super::entity_id::{parse_number, LexemeId, MAX_NUMERIC_ID};
use crate::error::{LexemeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(L[1-9][0-9]*)-([A-Z])([1-9][0-9]*)$").expect("sub-entity id pattern is valid")
});

/// Marker for a kind of sub-entity (form or sense)
pub trait SubEntityKind:
    Copy + Eq + Ord + Hash + Default + fmt::Debug + Send + Sync + 'static
{
    /// Letter preceding the number in the suffix
    const PREFIX: char;

    /// Human-readable kind, used in errors and logs
    const NAME: &'static str;
}

/// Form marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FormKind;

impl SubEntityKind for FormKind {
    const PREFIX: char = 'F';
    const NAME: &'static str = "form";
}

/// Sense marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SenseKind;

impl SubEntityKind for SenseKind {
    const PREFIX: char = 'S';
    const NAME: &'static str = "sense";
}

/// Identifier of a sub-entity of kind `K`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubEntityId<K: SubEntityKind> {
    serialization: String,
    lexeme: LexemeId,
    number: u64,
    kind: PhantomData<K>,
}

/// Form identifier (`L1-F1`)
pub type FormId = SubEntityId<FormKind>;

/// Sense identifier (`L1-S1`)
pub type SenseId = SubEntityId<SenseKind>;

impl<K: SubEntityKind> SubEntityId<K> {
    /// Parse and normalize a serialization such as `L1-F2`
    pub fn new(value: &str) -> Result<Self> {
        let invalid = |reason| LexemeError::InvalidFormat {
            kind: K::NAME,
            value: value.to_string(),
            reason,
        };

        let captures = PATTERN
            .captures(value)
            .ok_or_else(|| invalid("expected <lexeme id>-<letter><positive number>"))?;
        let prefix = captures[2].chars().next().map(|c| c.to_ascii_uppercase());
        if prefix != Some(K::PREFIX) {
            return Err(invalid("wrong sub-entity prefix"));
        }

        let lexeme = LexemeId::new(&captures[1]).map_err(|_| invalid("invalid lexeme part"))?;
        let number = parse_number(K::NAME, value, &captures[3])?;
        Ok(Self::assemble(lexeme, number))
    }

    /// Build the id of the `number`-th sub-entity of `lexeme`
    pub fn from_parts(lexeme: &LexemeId, number: u64) -> Result<Self> {
        if number == 0 || number > MAX_NUMERIC_ID {
            return Err(LexemeError::InvalidFormat {
                kind: K::NAME,
                value: format!("{}-{}{}", lexeme, K::PREFIX, number),
                reason: "numeric part out of range",
            });
        }
        Ok(Self::assemble(lexeme.clone(), number))
    }

    fn assemble(lexeme: LexemeId, number: u64) -> Self {
        Self {
            serialization: format!("{}-{}{}", lexeme, K::PREFIX, number),
            lexeme,
            number,
            kind: PhantomData,
        }
    }

    /// Id of the owning lexeme
    pub fn parent_id(&self) -> &LexemeId {
        &self.lexeme
    }

    /// Part after the separator, e.g. `F2`
    pub fn suffix(&self) -> &str {
        let split = self.lexeme.as_str().len() + 1;
        &self.serialization[split..]
    }

    /// Numeric part of the suffix
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Normalized serialization
    pub fn as_str(&self) -> &str {
        &self.serialization
    }
}

/// Ordered by owning lexeme, then by numeric suffix
impl<K: SubEntityKind> Ord for SubEntityId<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.lexeme.cmp(&other.lexeme) {
            Ordering::Equal => self.number.cmp(&other.number),
            other => other,
        }
    }
}

impl<K: SubEntityKind> PartialOrd for SubEntityId<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: SubEntityKind> fmt::Display for SubEntityId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

impl<K: SubEntityKind> FromStr for SubEntityId<K> {
    type Err = LexemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl<K: SubEntityKind> Serialize for SubEntityId<K> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.serialization)
    }
}

impl<'de, K: SubEntityKind> Deserialize<'de> for SubEntityId<K> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
