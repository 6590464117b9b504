use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lexeme_core::id::{ItemId, LexemeId, PropertyId};
use lexeme_core::model::{
    Form, Lexeme, Sense, Snak, Statement, StatementGuid, SubEntity, Term, TermList,
};
use lexeme_core::{serialize, Differ, LexemeDiffer, LexemePatcher, Patcher};

/// Lexeme with `size` forms and senses, each carrying a statement
fn build_lexeme(size: usize) -> Lexeme {
    let mut lexeme = Lexeme::with_id(LexemeId::new("L1").unwrap());
    lexeme.lemmas_mut().set_text("en", "run");
    lexeme.set_language(ItemId::new("Q1860").unwrap());
    lexeme.set_lexical_category(ItemId::new("Q24905").unwrap());

    for i in 0..size {
        let mut form = Form::blank(
            TermList::from_terms([Term::new("en", format!("run{}", i))]),
            vec![ItemId::from_number(i as u64 % 50 + 1).unwrap()],
        );
        form.statements_mut()
            .add(Statement::new(
                StatementGuid::generate("L1"),
                Snak::SomeValue {
                    property: PropertyId::new("P5").unwrap(),
                },
            ))
            .unwrap();
        lexeme.add_or_update_form(form).unwrap();

        let sense = Sense::blank(TermList::from_terms([Term::new("en", format!("gloss {}", i))]));
        lexeme.add_or_update_sense(sense).unwrap();
    }
    lexeme
}

/// Touch every tenth form and add a few new ones
fn edited(lexeme: &Lexeme) -> Lexeme {
    let mut edited = lexeme.clone();
    let ids: Vec<_> = edited.forms().ids().into_iter().cloned().collect();
    for id in ids.iter().step_by(10) {
        edited
            .form_mut(id)
            .unwrap()
            .representations_mut()
            .set_text("de", "laufen");
    }
    for _ in 0..3 {
        edited
            .add_or_update_form(Form::blank(
                TermList::from_terms([Term::new("en", "ran")]),
                vec![],
            ))
            .unwrap();
    }
    edited
}

/// Benchmark diffing two snapshots of growing lexemes
fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexeme_diff");
    let differ = LexemeDiffer::new();

    for size in [10, 100, 1000].iter() {
        let old = build_lexeme(*size);
        let new = edited(&old);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(differ.diff(&old, &new)));
        });
    }

    group.finish();
}

/// Benchmark replaying a diff onto the older snapshot
fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexeme_patch");
    let patcher = LexemePatcher::new();

    for size in [10, 100, 1000].iter() {
        let old = build_lexeme(*size);
        let diff = LexemeDiffer::new().diff(&old, &edited(&old));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || old.clone(),
                |mut target| {
                    patcher.patch(&mut target, &diff).unwrap();
                    black_box(target)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the persisted JSON shape
fn bench_serialize(c: &mut Criterion) {
    let lexeme = build_lexeme(1000);
    c.bench_function("lexeme_to_json_1000", |b| {
        b.iter(|| black_box(serialize::to_json_string(&lexeme).unwrap()));
    });

    let json = serialize::to_json_string(&lexeme).unwrap();
    c.bench_function("lexeme_from_json_1000", |b| {
        b.iter(|| black_box(serialize::from_json_str(&json).unwrap()));
    });
}

criterion_group!(benches, bench_diff, bench_patch, bench_serialize);
criterion_main!(benches);
