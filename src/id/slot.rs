//! Id lifecycle of a sub-entity
//!
//! A form or sense is created with a pending id and receives its real id
//! exactly once, when it is attached to a lexeme.

use crate::error::{LexemeError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Either an assigned id or a placeholder awaiting assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdSlot<I> {
    /// Not yet attached to a lexeme
    Pending,
    /// Real id
    Assigned(I),
}

impl<I> Default for IdSlot<I> {
    fn default() -> Self {
        IdSlot::Pending
    }
}

impl<I> IdSlot<I> {
    /// The assigned id, if any
    pub fn assigned(&self) -> Option<&I> {
        match self {
            IdSlot::Assigned(id) => Some(id),
            IdSlot::Pending => None,
        }
    }

    /// Whether the slot still holds the placeholder
    pub fn is_pending(&self) -> bool {
        matches!(self, IdSlot::Pending)
    }
}

impl<I: PartialEq + fmt::Display> IdSlot<I> {
    /// Replace the placeholder with a real id
    ///
    /// Re-assigning the same id is a no-op; replacing one real id with a
    /// different one is an invariant violation.
    pub fn assign(&mut self, id: I) -> Result<()> {
        match self {
            IdSlot::Pending => {
                *self = IdSlot::Assigned(id);
                Ok(())
            }
            IdSlot::Assigned(existing) if *existing == id => Ok(()),
            IdSlot::Assigned(existing) => Err(LexemeError::invariant(format!(
                "cannot replace assigned id {} with {}",
                existing, id
            ))),
        }
    }
}

impl<I: fmt::Display> fmt::Display for IdSlot<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSlot::Assigned(id) => id.fmt(f),
            IdSlot::Pending => f.write_str("<pending>"),
        }
    }
}

impl<I: Serialize> Serialize for IdSlot<I> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.assigned().serialize(serializer)
    }
}

impl<'de, I: Deserialize<'de>> Deserialize<'de> for IdSlot<I> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<I>::deserialize(deserializer)? {
            Some(id) => IdSlot::Assigned(id),
            None => IdSlot::Pending,
        })
    }
}
