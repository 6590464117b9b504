//! Detecting diff steps that no longer apply cleanly
//!
//! Patchers overwrite unconditionally. Before a diff computed against one
//! revision is replayed onto another, [`ConflictCheck`] compares every step
//! with the target. A step conflicts when the target has moved away from the
//! value the diff was computed against and has not already reached the
//! step's result.

use crate::diff::{
    DiffOp, FormDiff, LexemeDiff, MapDiff, SenseDiff, StatementListDiff, SubEntityChange,
    SubEntitySetDiff, TermListDiff,
};
use crate::model::{Form, Lexeme, LexemeChild, Sense, StatementList, SubEntity, TermList};
use std::fmt;

/// A diff step that would overwrite a change it was not computed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConflict {
    /// Where the step applies, e.g. `lemmas.en` or `L1-F1.representations.de`
    pub path: String,
    pub reason: &'static str,
}

impl fmt::Display for PatchConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Finds the steps of a diff that conflict with a target
pub trait ConflictCheck<T> {
    /// Push every conflicting step under `path` onto `out`
    fn conflicts_at(&self, target: &T, path: &str, out: &mut Vec<PatchConflict>);

    /// Every conflicting step, empty when the diff applies cleanly
    fn conflicts(&self, target: &T) -> Vec<PatchConflict> {
        let mut out = Vec::new();
        self.conflicts_at(target, "", &mut out);
        out
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

/// Why `op` cannot be replayed onto `current`, if it cannot
fn step_conflict<T: PartialEq>(op: &DiffOp<T>, current: Option<&T>) -> Option<&'static str> {
    match (op, current) {
        (DiffOp::Add(new), Some(value)) if value != new => {
            Some("added concurrently with a different value")
        }
        (DiffOp::Change { old, new }, Some(value)) if value != old && value != new => {
            Some("changed concurrently")
        }
        (DiffOp::Change { .. }, None) => Some("removed concurrently"),
        (DiffOp::Remove(old), Some(value)) if value != old => Some("changed concurrently"),
        _ => None,
    }
}

fn check_step<T: PartialEq>(
    op: &DiffOp<T>,
    current: Option<&T>,
    path: String,
    out: &mut Vec<PatchConflict>,
) {
    if let Some(reason) = step_conflict(op, current) {
        out.push(PatchConflict { path, reason });
    }
}

fn check_map<'a, K, V, F>(diff: &MapDiff<K, V>, lookup: F, path: &str, out: &mut Vec<PatchConflict>)
where
    K: Ord + fmt::Display,
    V: PartialEq + 'a,
    F: Fn(&K) -> Option<&'a V>,
{
    for (key, op) in diff.iter() {
        check_step(op, lookup(key), join(path, &key.to_string()), out);
    }
}

impl ConflictCheck<TermList> for TermListDiff {
    fn conflicts_at(&self, terms: &TermList, path: &str, out: &mut Vec<PatchConflict>) {
        check_map(self, |language| terms.as_map().get(language), path, out);
    }
}

/// Only per-guid entries are checked; a recorded order always applies
impl ConflictCheck<StatementList> for StatementListDiff {
    fn conflicts_at(&self, statements: &StatementList, path: &str, out: &mut Vec<PatchConflict>) {
        check_map(&self.changes, |guid| statements.get(guid), path, out);
    }
}

/// Grammatical features form a set, so adding or removing one never conflicts
impl ConflictCheck<Form> for FormDiff {
    fn conflicts_at(&self, form: &Form, path: &str, out: &mut Vec<PatchConflict>) {
        self.representations
            .conflicts_at(form.representations(), &join(path, "representations"), out);
        self.statements
            .conflicts_at(form.statements(), &join(path, "claims"), out);
    }
}

impl ConflictCheck<Sense> for SenseDiff {
    fn conflicts_at(&self, sense: &Sense, path: &str, out: &mut Vec<PatchConflict>) {
        self.glosses
            .conflicts_at(sense.glosses(), &join(path, "glosses"), out);
        self.statements
            .conflicts_at(sense.statements(), &join(path, "claims"), out);
    }
}

impl<E, D> ConflictCheck<Lexeme> for SubEntitySetDiff<E, D>
where
    E: LexemeChild + PartialEq,
    D: ConflictCheck<E>,
{
    fn conflicts_at(&self, lexeme: &Lexeme, path: &str, out: &mut Vec<PatchConflict>) {
        let set = E::set_of(lexeme);
        for change in self {
            match change {
                SubEntityChange::Added { entity, .. } => {
                    let Some(id) = entity.id() else { continue };
                    let path = join(path, id.as_str());
                    match set.get(id) {
                        Some(existing) if existing != entity => out.push(PatchConflict {
                            path,
                            reason: "added concurrently with different content",
                        }),
                        Some(_) => {}
                        // Removed by someone else after being issued
                        None if id.number() < E::next_id_of(lexeme) => out.push(PatchConflict {
                            path,
                            reason: "id was already issued",
                        }),
                        None => {}
                    }
                }
                SubEntityChange::Removed { id, diff } => {
                    if let Some(existing) = set.get(id) {
                        diff.conflicts_at(existing, &join(path, id.as_str()), out);
                    }
                }
                SubEntityChange::Changed { id, diff } => match set.get(id) {
                    Some(existing) => diff.conflicts_at(existing, &join(path, id.as_str()), out),
                    None => out.push(PatchConflict {
                        path: join(path, id.as_str()),
                        reason: "removed concurrently",
                    }),
                },
            }
        }
    }
}

/// Counter steps never conflict; patching a counter is idempotent
impl ConflictCheck<Lexeme> for LexemeDiff {
    fn conflicts_at(&self, lexeme: &Lexeme, path: &str, out: &mut Vec<PatchConflict>) {
        self.lemmas
            .conflicts_at(lexeme.lemmas(), &join(path, "lemmas"), out);
        if let Some(op) = &self.lexical_category {
            check_step(
                op,
                lexeme.lexical_category_if_set(),
                join(path, "lexicalCategory"),
                out,
            );
        }
        if let Some(op) = &self.language {
            check_step(op, lexeme.language_if_set(), join(path, "language"), out);
        }
        self.statements
            .conflicts_at(lexeme.statements(), &join(path, "claims"), out);
        self.forms.conflicts_at(lexeme, path, out);
        self.senses.conflicts_at(lexeme, path, out);
    }
}
