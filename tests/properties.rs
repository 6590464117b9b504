//! Property-based tests for the lexeme aggregate and its diff/patch engine.
//!
//! Lexemes are built from random sequences of edits, then checked for the
//! counter invariant, diff/patch round trips and set behavior.

use proptest::prelude::*;

use lexeme_core::change_op::{AddForm, AddSense, ChangeOp, ChangeTarget, RemoveForm, RemoveSense};
use lexeme_core::diff::{DiffOp, Differ, LexemeDiff, LexemeDiffer};
use lexeme_core::id::{FormId, ItemId, LexemeId, PropertyId};
use lexeme_core::model::{
    Form, FormSet, Lexeme, Snak, Statement, StatementGuid, StatementList, Term, TermList,
};
use lexeme_core::patch::{LexemePatcher, Patcher};
use lexeme_core::serialize;
use lexeme_core::LexemeError;

/// One random edit
#[derive(Debug, Clone)]
enum Step {
    SetLemma(&'static str, String),
    SetLanguage(Option<u64>),
    AddForm(String),
    RemoveForm(usize),
    EditForm(usize, &'static str, String),
    AddFeature(usize, u64),
    AddSense(String),
    RemoveSense(usize),
    EditSense(usize, &'static str, String),
    AddStatement(u64),
    RemoveStatement(usize),
    ReverseStatements,
}

fn language() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["en", "de", "fr"])
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (language(), "[a-z]{0,6}").prop_map(|(l, t)| Step::SetLemma(l, t)),
        prop::option::of(1u64..100).prop_map(Step::SetLanguage),
        "[a-z]{1,6}".prop_map(Step::AddForm),
        any::<usize>().prop_map(Step::RemoveForm),
        (any::<usize>(), language(), "[a-z]{1,6}").prop_map(|(i, l, t)| Step::EditForm(i, l, t)),
        (any::<usize>(), 1u64..20).prop_map(|(i, q)| Step::AddFeature(i, q)),
        "[a-z]{1,6}".prop_map(Step::AddSense),
        any::<usize>().prop_map(Step::RemoveSense),
        (any::<usize>(), language(), "[a-z]{1,6}").prop_map(|(i, l, t)| Step::EditSense(i, l, t)),
        (1u64..50).prop_map(Step::AddStatement),
        any::<usize>().prop_map(Step::RemoveStatement),
        Just(Step::ReverseStatements),
    ]
}

fn en(text: &str) -> TermList {
    TermList::from_terms([Term::new("en", text)])
}

fn apply_op(lexeme: &mut Lexeme, op: &dyn ChangeOp) {
    op.apply(&mut ChangeTarget::Lexeme(lexeme), None).unwrap();
}

fn apply(lexeme: &mut Lexeme, step: &Step) {
    match step {
        Step::SetLemma(language, text) => lexeme.lemmas_mut().set_text(*language, text.as_str()),
        Step::SetLanguage(Some(q)) => lexeme.set_language(ItemId::from_number(*q).unwrap()),
        Step::SetLanguage(None) => lexeme.clear_language(),
        Step::AddForm(text) => apply_op(lexeme, &AddForm::new(en(text), vec![])),
        Step::RemoveForm(i) => {
            let ids = lexeme.forms().ids();
            if !ids.is_empty() {
                let id = ids[i % ids.len()].clone();
                apply_op(lexeme, &RemoveForm::new(id));
            }
        }
        Step::EditForm(i, language, text) => {
            let ids = lexeme.forms().ids();
            if !ids.is_empty() {
                let id = ids[i % ids.len()].clone();
                let form = lexeme.form_mut(&id).unwrap();
                form.representations_mut().set_text(*language, text.as_str());
            }
        }
        Step::AddFeature(i, q) => {
            let ids = lexeme.forms().ids();
            if !ids.is_empty() {
                let id = ids[i % ids.len()].clone();
                let form = lexeme.form_mut(&id).unwrap();
                form.add_grammatical_feature(ItemId::from_number(*q).unwrap());
            }
        }
        Step::AddSense(text) => apply_op(lexeme, &AddSense::new(en(text))),
        Step::RemoveSense(i) => {
            let ids = lexeme.senses().ids();
            if !ids.is_empty() {
                let id = ids[i % ids.len()].clone();
                apply_op(lexeme, &RemoveSense::new(id));
            }
        }
        Step::EditSense(i, language, text) => {
            let ids = lexeme.senses().ids();
            if !ids.is_empty() {
                let id = ids[i % ids.len()].clone();
                let sense = lexeme.sense_mut(&id).unwrap();
                sense.glosses_mut().set_text(*language, text.as_str());
            }
        }
        Step::AddStatement(p) => {
            let statement = Statement::new(
                StatementGuid::generate("L1"),
                Snak::SomeValue {
                    property: PropertyId::from_number(*p).unwrap(),
                },
            );
            lexeme.statements_mut().add(statement).unwrap();
        }
        Step::RemoveStatement(i) => {
            let guids: Vec<StatementGuid> =
                lexeme.statements().guids().into_iter().cloned().collect();
            if !guids.is_empty() {
                lexeme.statements_mut().remove(&guids[i % guids.len()]);
            }
        }
        Step::ReverseStatements => {
            let mut guids: Vec<StatementGuid> =
                lexeme.statements().guids().into_iter().cloned().collect();
            guids.reverse();
            lexeme.statements_mut().reorder(&guids);
        }
    }
}

fn l1() -> Lexeme {
    Lexeme::with_id(LexemeId::new("L1").unwrap())
}

fn build(steps: &[Step]) -> Lexeme {
    let mut lexeme = l1();
    for step in steps {
        apply(&mut lexeme, step);
    }
    lexeme
}

fn counters_hold(lexeme: &Lexeme) -> bool {
    let forms = lexeme.forms();
    let senses = lexeme.senses();
    lexeme.next_form_id() > (forms.len() as u64).max(forms.max_suffix_number())
        && lexeme.next_sense_id() > (senses.len() as u64).max(senses.max_suffix_number())
}

fn form(number: u64, text: &str) -> Form {
    Form::new(
        FormId::new(&format!("L1-F{}", number)).unwrap(),
        en(text),
        vec![],
        StatementList::new(),
    )
}

proptest! {
    /// The counter invariant holds after every edit.
    #[test]
    fn counter_invariant_holds(steps in prop::collection::vec(step(), 0..40)) {
        let mut lexeme = l1();
        for step in &steps {
            let before = (lexeme.next_form_id(), lexeme.next_sense_id());
            apply(&mut lexeme, step);
            prop_assert!(counters_hold(&lexeme));
            prop_assert!(lexeme.next_form_id() >= before.0);
            prop_assert!(lexeme.next_sense_id() >= before.1);
        }
    }

    /// Patching the older snapshot with the diff reproduces the newer one.
    #[test]
    fn diff_patch_round_trip(
        before in prop::collection::vec(step(), 0..20),
        after in prop::collection::vec(step(), 0..20),
    ) {
        let old = build(&before);
        let mut new = old.clone();
        for step in &after {
            apply(&mut new, step);
        }

        let diff = LexemeDiffer::new().diff(&old, &new);
        let mut patched = old.clone();
        LexemePatcher::new().patch(&mut patched, &diff).unwrap();
        prop_assert_eq!(patched, new);
    }

    /// A construction diff rebuilds the lexeme from an empty one with the same id.
    #[test]
    fn construction_diff_round_trip(steps in prop::collection::vec(step(), 0..30)) {
        let lexeme = build(&steps);
        let diff = LexemeDiffer::new().construction_diff(&lexeme);

        let mut rebuilt = l1();
        LexemePatcher::new().patch(&mut rebuilt, &diff).unwrap();
        prop_assert_eq!(rebuilt, lexeme);
    }

    /// Applying the same counter increase twice lands on the same value.
    #[test]
    fn counter_patch_is_idempotent(target in 2u64..10_000) {
        let diff = LexemeDiff {
            next_form_id: Some(DiffOp::Change { old: 1, new: target }),
            next_sense_id: Some(DiffOp::Change { old: 1, new: target }),
            ..LexemeDiff::default()
        };

        let mut lexeme = l1();
        LexemePatcher::new().patch(&mut lexeme, &diff).unwrap();
        LexemePatcher::new().patch(&mut lexeme, &diff).unwrap();
        prop_assert_eq!(lexeme.next_form_id(), target);
        prop_assert_eq!(lexeme.next_sense_id(), target);
    }

    /// `add` conflicts exactly on duplicate ids; `put` always replaces.
    #[test]
    fn set_uniqueness(numbers in prop::collection::vec(1u64..20, 0..40)) {
        let mut added = FormSet::new();
        let mut put = FormSet::new();
        let mut seen = std::collections::HashSet::new();

        for (i, number) in numbers.iter().enumerate() {
            let text = format!("v{}", i);
            let result = added.add(form(*number, &text));
            if seen.insert(*number) {
                prop_assert!(result.is_ok());
            } else {
                let is_conflict = matches!(result, Err(LexemeError::Conflict { .. }));
                prop_assert!(is_conflict);
            }

            put.put(form(*number, &text)).unwrap();
            let id = FormId::new(&format!("L1-F{}", number)).unwrap();
            prop_assert_eq!(put.get(&id).unwrap().representations().text("en"), Some(text.as_str()));
        }
        prop_assert_eq!(added.len(), seen.len());
        prop_assert_eq!(put.len(), seen.len());
    }

    /// Presentation order follows the numeric suffix whatever the insertion order.
    #[test]
    fn ordering_is_deterministic(
        numbers in prop::collection::hash_set(1u64..1000, 0..30)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let set = FormSet::from_entities(numbers.iter().map(|n| form(*n, "x"))).unwrap();
        let ordered: Vec<u64> = set.ids().iter().map(|id| id.number()).collect();

        let mut expected = numbers.clone();
        expected.sort_unstable();
        prop_assert_eq!(ordered, expected);
        prop_assert_eq!(set.to_ordered_vec().len(), numbers.len());
    }

    /// The persisted shape round-trips, counters included.
    #[test]
    fn serialization_round_trip(steps in prop::collection::vec(step(), 0..30)) {
        let lexeme = build(&steps);
        let json = serialize::to_json_string(&lexeme).unwrap();
        let back = serialize::from_json_str(&json).unwrap();
        prop_assert_eq!(back, lexeme);
    }
}
