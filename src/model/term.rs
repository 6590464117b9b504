//! Terms and language-keyed term lists
//!
//! Lemmas, representations and glosses are all term lists: at most one term
//! per language code, ordered by language code.

use crate::error::{LexemeError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Text in a single language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Language code
    pub language: String,

    /// Text in that language
    pub value: String,
}

impl Term {
    /// Create a term
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            value: value.into(),
        }
    }
}

/// Language-keyed list of terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermList {
    terms: BTreeMap<String, String>,
}

impl TermList {
    /// Create an empty term list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a term list; later terms replace earlier ones in the same language
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut list = Self::new();
        for term in terms {
            list.set(term);
        }
        list
    }

    /// Set the term for its language. An empty value removes the language.
    pub fn set(&mut self, term: Term) {
        if term.value.is_empty() {
            self.terms.remove(&term.language);
        } else {
            self.terms.insert(term.language, term.value);
        }
    }

    /// Set the text for a language
    pub fn set_text(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.set(Term::new(language, value));
    }

    /// Remove the term in `language`, returning it if present
    pub fn remove(&mut self, language: &str) -> Option<Term> {
        self.terms
            .remove_entry(language)
            .map(|(language, value)| Term { language, value })
    }

    /// Term for a language
    pub fn get(&self, language: &str) -> Option<Term> {
        self.terms
            .get(language)
            .map(|value| Term::new(language, value.clone()))
    }

    /// Text for a language
    pub fn text(&self, language: &str) -> Option<&str> {
        self.terms.get(language).map(String::as_str)
    }

    /// Whether a term exists for `language`
    pub fn has_language(&self, language: &str) -> bool {
        self.terms.contains_key(language)
    }

    /// Number of languages
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the list holds no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `(language, text)` pairs ordered by language code
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    /// Language codes in order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.terms
    }
}

/// Serialized as `{ "<lang>": { "language": "<lang>", "value": "<text>" } }`
impl Serialize for TermList {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let terms: BTreeMap<&str, Term> = self
            .terms
            .iter()
            .map(|(l, v)| (l.as_str(), Term::new(l.clone(), v.clone())))
            .collect();
        terms.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TermList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Term>::deserialize(deserializer)?;
        let mut list = TermList::new();
        for (key, term) in raw {
            if key != term.language {
                return Err(serde::de::Error::custom(LexemeError::Serialization(format!(
                    "term keyed '{}' declares language '{}'",
                    key, term.language
                ))));
            }
            list.set(term);
        }
        Ok(list)
    }
}

impl FromIterator<Term> for TermList {
    fn from_iter<T: IntoIterator<Item = Term>>(iter: T) -> Self {
        Self::from_terms(iter)
    }
}

/// Require at least one term, reporting `field` on failure
pub(crate) fn require_terms(
    list: &TermList,
    entity: &'static str,
    field: &'static str,
) -> Result<()> {
    if list.is_empty() {
        return Err(LexemeError::MinimumContent { entity, field });
    }
    Ok(())
}
