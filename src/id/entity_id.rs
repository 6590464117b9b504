//! Top-level entity identifiers
//!
//! `LexemeId`, `ItemId` and `PropertyId` share one shape: an upper-case
//! letter followed by a positive number without leading zeros (`L1`, `Q42`,
//! `P31`). Input is matched case-insensitively and normalized to upper case.

use crate::error::{LexemeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest numeric component any identifier may carry
pub const MAX_NUMERIC_ID: u64 = 2_147_483_647;

/// Parse the digits of an id, rejecting anything above [`MAX_NUMERIC_ID`]
pub(crate) fn parse_number(kind: &'static str, value: &str, digits: &str) -> Result<u64> {
    match digits.parse::<u64>() {
        Ok(number) if number <= MAX_NUMERIC_ID => Ok(number),
        _ => Err(LexemeError::InvalidFormat {
            kind,
            value: value.to_string(),
            reason: "numeric part exceeds the maximum id",
        }),
    }
}

macro_rules! numeric_entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            serialization: String,
            number: u64,
        }

        impl $name {
            /// Single-letter prefix of the serialization
            pub const PREFIX: &'static str = $prefix;

            /// Parse and normalize a serialization such as
            #[doc = concat!("`", $prefix, "1`")]
            pub fn new(value: &str) -> Result<Self> {
                static PATTERN: Lazy<Regex> = Lazy::new(|| {
                    Regex::new(concat!(r"(?i)^", $prefix, r"([1-9][0-9]*)$"))
                        .expect("identifier pattern is valid")
                });

                let captures = PATTERN.captures(value).ok_or_else(|| LexemeError::InvalidFormat {
                    kind: $kind,
                    value: value.to_string(),
                    reason: concat!("expected ", $prefix, " followed by a positive number"),
                })?;
                let number = parse_number($kind, value, &captures[1])?;

                Ok(Self {
                    serialization: format!("{}{}", $prefix, number),
                    number,
                })
            }

            /// Build an id from its numeric part
            pub fn from_number(number: u64) -> Result<Self> {
                if number == 0 || number > MAX_NUMERIC_ID {
                    return Err(LexemeError::InvalidFormat {
                        kind: $kind,
                        value: format!("{}{}", $prefix, number),
                        reason: "numeric part out of range",
                    });
                }
                Ok(Self {
                    serialization: format!("{}{}", $prefix, number),
                    number,
                })
            }

            /// Numeric part of the id
            pub fn number(&self) -> u64 {
                self.number
            }

            /// Normalized serialization
            pub fn as_str(&self) -> &str {
                &self.serialization
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.number.cmp(&other.number)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.serialization)
            }
        }

        impl FromStr for $name {
            type Err = LexemeError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.serialization)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

numeric_entity_id!(
    /// Identifier of a lexeme (`L<n>`)
    LexemeId,
    "L",
    "lexeme"
);

numeric_entity_id!(
    /// Identifier of an item (`Q<n>`), used for languages, lexical
    /// categories and grammatical features
    ItemId,
    "Q",
    "item"
);

numeric_entity_id!(
    /// Identifier of a property (`P<n>`), the key of a statement
    PropertyId,
    "P",
    "property"
);
