//! Identifiers
//!
//! All identifiers are immutable, validated on construction and normalized
//! to upper case. Sub-entity ids derive their owning lexeme from their own
//! serialization.

mod entity_id;
mod slot;
mod sub_entity_id;

pub use entity_id::{ItemId, LexemeId, PropertyId, MAX_NUMERIC_ID};
pub use slot::IdSlot;
pub use sub_entity_id::{FormId, FormKind, SenseId, SenseKind, SubEntityId, SubEntityKind};
