//! Behaviour shared by forms and senses

use super::statement::StatementList;
use crate::id::{IdSlot, SubEntityId, SubEntityKind};
use std::fmt;

/// A form or sense: identified relative to its lexeme, never stored alone
///
/// `PartialEq` on implementors compares content only; the id is excluded.
pub trait SubEntity: Clone + PartialEq + fmt::Debug {
    /// Kind marker shared with the id type
    type Kind: SubEntityKind;

    /// Current id slot
    fn id_slot(&self) -> &IdSlot<SubEntityId<Self::Kind>>;

    /// Mutable id slot, used when the entity is attached to a lexeme
    fn id_slot_mut(&mut self) -> &mut IdSlot<SubEntityId<Self::Kind>>;

    /// Statements about this sub-entity
    fn statements(&self) -> &StatementList;

    /// Mutable statements
    fn statements_mut(&mut self) -> &mut StatementList;

    /// Whether the minimum content (one representation / gloss) is present
    fn has_minimum_content(&self) -> bool;

    /// The assigned id, if any
    fn id(&self) -> Option<&SubEntityId<Self::Kind>> {
        self.id_slot().assigned()
    }
}
