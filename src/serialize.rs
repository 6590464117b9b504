//! Persisted JSON shape of lexemes, forms and senses
//!
//! ```json
//! {
//!   "id": "L1",
//!   "lemmas": { "en": { "language": "en", "value": "apple" } },
//!   "lexicalCategory": "Q1084",
//!   "language": "Q1860",
//!   "claims": [],
//!   "nextFormId": 2,
//!   "forms": [ { "id": "L1-F1", "representations": {}, "grammaticalFeatures": [], "claims": [] } ],
//!   "nextSenseId": 1,
//!   "senses": []
//! }
//! ```
//!
//! Forms and senses are written in suffix order. A missing counter is read
//! as one past the largest suffix in use.

use crate::error::{LexemeError, Result};
use crate::id::{FormId, ItemId, LexemeId, SenseId, SubEntityId};
use crate::model::{
    Form, FormSet, Lexeme, LexemeParts, Sense, SenseSet, StatementList, SubEntity, SubEntitySet,
    TermList,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: FormId,
    #[serde(default)]
    pub representations: TermList,
    #[serde(default)]
    pub grammatical_features: Vec<ItemId>,
    #[serde(default)]
    pub claims: StatementList,
}

impl FormRecord {
    fn new(id: &FormId, form: &Form) -> Self {
        Self {
            id: id.clone(),
            representations: form.representations().clone(),
            grammatical_features: form.grammatical_features().to_vec(),
            claims: form.statements().clone(),
        }
    }
}

impl From<FormRecord> for Form {
    fn from(record: FormRecord) -> Self {
        Form::new(
            record.id,
            record.representations,
            record.grammatical_features,
            record.claims,
        )
    }
}

/// Serialized sense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub id: SenseId,
    #[serde(default)]
    pub glosses: TermList,
    #[serde(default)]
    pub claims: StatementList,
}

impl SenseRecord {
    fn new(id: &SenseId, sense: &Sense) -> Self {
        Self {
            id: id.clone(),
            glosses: sense.glosses().clone(),
            claims: sense.statements().clone(),
        }
    }
}

impl From<SenseRecord> for Sense {
    fn from(record: SenseRecord) -> Self {
        Sense::new(record.id, record.glosses, record.claims)
    }
}

/// Serialized lexeme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexemeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LexemeId>,
    #[serde(default)]
    pub lemmas: TermList,
    #[serde(default)]
    pub lexical_category: Option<ItemId>,
    #[serde(default)]
    pub language: Option<ItemId>,
    #[serde(default)]
    pub claims: StatementList,
    #[serde(default)]
    pub next_form_id: Option<u64>,
    #[serde(default)]
    pub forms: Vec<FormRecord>,
    #[serde(default)]
    pub next_sense_id: Option<u64>,
    #[serde(default)]
    pub senses: Vec<SenseRecord>,
}

/// Records in suffix order
fn ordered_records<E, R>(
    set: &SubEntitySet<E>,
    build: impl Fn(&SubEntityId<E::Kind>, &E) -> R,
) -> Vec<R>
where
    E: SubEntity,
{
    set.ids()
        .into_iter()
        .filter_map(|id| set.get(id).map(|entity| build(id, entity)))
        .collect()
}

impl From<&Lexeme> for LexemeRecord {
    fn from(lexeme: &Lexeme) -> Self {
        Self {
            id: lexeme.id().cloned(),
            lemmas: lexeme.lemmas().clone(),
            lexical_category: lexeme.lexical_category_if_set().cloned(),
            language: lexeme.language_if_set().cloned(),
            claims: lexeme.statements().clone(),
            next_form_id: Some(lexeme.next_form_id()),
            forms: ordered_records(lexeme.forms(), FormRecord::new),
            next_sense_id: Some(lexeme.next_sense_id()),
            senses: ordered_records(lexeme.senses(), SenseRecord::new),
        }
    }
}

impl TryFrom<LexemeRecord> for Lexeme {
    type Error = LexemeError;

    fn try_from(record: LexemeRecord) -> Result<Self> {
        let forms = FormSet::from_entities(record.forms.into_iter().map(Form::from))?;
        let senses = SenseSet::from_entities(record.senses.into_iter().map(Sense::from))?;

        Lexeme::from_parts(LexemeParts {
            id: record.id,
            lemmas: record.lemmas,
            lexical_category: record.lexical_category,
            language: record.language,
            statements: record.claims,
            next_form_id: record
                .next_form_id
                .unwrap_or_else(|| forms.max_suffix_number() + 1),
            next_sense_id: record
                .next_sense_id
                .unwrap_or_else(|| senses.max_suffix_number() + 1),
            forms,
            senses,
        })
    }
}

impl Serialize for Lexeme {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        LexemeRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Lexeme {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = LexemeRecord::deserialize(deserializer)?;
        Lexeme::try_from(record).map_err(serde::de::Error::custom)
    }
}

/// Encode a lexeme as a JSON value
pub fn to_json(lexeme: &Lexeme) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(LexemeRecord::from(lexeme))?)
}

/// Encode a lexeme as a JSON string
pub fn to_json_string(lexeme: &Lexeme) -> Result<String> {
    Ok(serde_json::to_string(&LexemeRecord::from(lexeme))?)
}

/// Decode a lexeme from a JSON value, validating ids and counters
pub fn from_json(value: serde_json::Value) -> Result<Lexeme> {
    let record: LexemeRecord = serde_json::from_value(value)?;
    Lexeme::try_from(record)
}

/// Decode a lexeme from a JSON string, validating ids and counters
pub fn from_json_str(json: &str) -> Result<Lexeme> {
    let record: LexemeRecord = serde_json::from_str(json)?;
    Lexeme::try_from(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::PropertyId;
    use crate::model::{Snak, Statement, StatementGuid, Term};
    use serde_json::json;

    fn sample() -> Lexeme {
        let mut lexeme = Lexeme::with_id(LexemeId::new("L1").unwrap());
        lexeme.lemmas_mut().set_text("en", "apple");
        lexeme.set_language(ItemId::new("Q1860").unwrap());
        lexeme.set_lexical_category(ItemId::new("Q1084").unwrap());
        lexeme
            .statements_mut()
            .add(Statement::new(
                StatementGuid::new("L1$1"),
                Snak::NoValue {
                    property: PropertyId::new("P5").unwrap(),
                },
            ))
            .unwrap();
        for text in ["apple", "apples", "apple's"] {
            lexeme
                .add_or_update_form(Form::blank(
                    TermList::from_terms([Term::new("en", text)]),
                    vec![ItemId::new("Q110786").unwrap()],
                ))
                .unwrap();
        }
        lexeme
            .add_or_update_sense(Sense::blank(TermList::from_terms([Term::new(
                "en", "a fruit",
            )])))
            .unwrap();
        lexeme
    }

    #[test]
    fn test_key_order_and_shape() {
        let json = to_json_string(&sample()).unwrap();
        let keys = [
            "\"id\"",
            "\"lemmas\"",
            "\"lexicalCategory\"",
            "\"language\":\"Q1860\"",
            "\"claims\"",
            "\"nextFormId\"",
            "\"forms\"",
            "\"nextSenseId\"",
            "\"senses\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);

        let value = to_json(&sample()).unwrap();
        assert_eq!(value["nextFormId"], 4);
        assert_eq!(value["forms"][0]["id"], "L1-F1");
        assert_eq!(value["forms"][2]["id"], "L1-F3");
        assert_eq!(value["forms"][0]["grammaticalFeatures"][0], "Q110786");
        assert_eq!(value["senses"][0]["glosses"]["en"]["value"], "a fruit");
    }

    #[test]
    fn test_round_trip() {
        let lexeme = sample();
        let back = from_json(to_json(&lexeme).unwrap()).unwrap();
        assert_eq!(back, lexeme);

        let text = serde_json::to_string(&lexeme).unwrap();
        let back: Lexeme = serde_json::from_str(&text).unwrap();
        assert_eq!(back, lexeme);
    }

    #[test]
    fn test_counters_survive_removal() {
        let mut lexeme = sample();
        lexeme.remove_form(&FormId::new("L1-F3").unwrap());
        let back = from_json(to_json(&lexeme).unwrap()).unwrap();
        assert_eq!(back.next_form_id(), 4);
    }

    #[test]
    fn test_missing_counters_default_past_max_suffix() {
        let value = json!({
            "id": "L1",
            "forms": [
                { "id": "L1-F2", "representations": { "en": { "language": "en", "value": "a" } } },
                { "id": "L1-F7", "representations": { "en": { "language": "en", "value": "b" } } }
            ]
        });
        let lexeme = from_json(value).unwrap();
        assert_eq!(lexeme.next_form_id(), 8);
        assert_eq!(lexeme.next_sense_id(), 1);
    }

    #[test]
    fn test_rejects_inconsistent_counter() {
        let value = json!({
            "id": "L1",
            "nextFormId": 2,
            "forms": [ { "id": "L1-F5" } ]
        });
        assert!(matches!(
            from_json(value),
            Err(LexemeError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_forms() {
        let value = json!({
            "id": "L1",
            "forms": [ { "id": "L1-F1" }, { "id": "L1-F1" } ]
        });
        assert!(matches!(from_json(value), Err(LexemeError::Conflict { .. })));
    }

    #[test]
    fn test_rejects_malformed_id() {
        let value = json!({ "id": "L1", "forms": [ { "id": "L1-F0" } ] });
        assert!(matches!(
            from_json(value),
            Err(LexemeError::Serialization(_))
        ));
    }
}
