//! Structured edit summaries
//!
//! Change ops describe what they did as a [`Summary`]: an action keyword, an
//! optional language code and the affected values. Rendering the fragments
//! as text belongs to the host.

use serde::{Deserialize, Serialize};

/// One summary fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    action: Option<String>,
    language: Option<String>,
    args: Vec<String>,
}

impl Summary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the summary with a new fragment
    pub fn set(
        &mut self,
        action: impl Into<String>,
        language: Option<&str>,
        args: impl IntoIterator<Item = String>,
    ) {
        self.action = Some(action.into());
        self.language = language.map(str::to_owned);
        self.args = args.into_iter().collect();
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.action.is_none()
    }
}

/// Merges the summaries of several change ops into one
///
/// A single fragment is kept as is. Fragments that share an action are
/// merged into one with all their arguments. Anything else collapses into
/// the fallback action, which names the kind of edit without listing values.
#[derive(Debug, Clone)]
pub struct SummaryAggregator {
    fallback_action: String,
}

impl SummaryAggregator {
    pub fn new(fallback_action: impl Into<String>) -> Self {
        Self {
            fallback_action: fallback_action.into(),
        }
    }

    pub fn fallback_action(&self) -> &str {
        &self.fallback_action
    }

    /// Combine `summaries`, ignoring empty ones
    pub fn aggregate(&self, summaries: &[Summary]) -> Summary {
        let recorded: Vec<&Summary> = summaries.iter().filter(|s| !s.is_empty()).collect();

        let (first, rest) = match recorded.split_first() {
            None => return Summary::new(),
            Some((first, [])) => return (*first).clone(),
            Some((first, rest)) => (*first, rest),
        };

        let language = rest
            .iter()
            .all(|s| s.language == first.language)
            .then(|| first.language.clone())
            .flatten();

        if rest.iter().all(|s| s.action == first.action) {
            Summary {
                action: first.action.clone(),
                language,
                args: recorded.iter().flat_map(|s| s.args.iter().cloned()).collect(),
            }
        } else {
            Summary {
                action: Some(self.fallback_action.clone()),
                language,
                args: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(action: &str, language: Option<&str>, args: &[&str]) -> Summary {
        let mut s = Summary::new();
        s.set(action, language, args.iter().map(|a| a.to_string()));
        s
    }

    #[test]
    fn test_empty_input() {
        let aggregator = SummaryAggregator::new("update-form-elements");
        assert!(aggregator.aggregate(&[]).is_empty());
        assert!(aggregator.aggregate(&[Summary::new(), Summary::new()]).is_empty());
    }

    #[test]
    fn test_single_summary_kept() {
        let aggregator = SummaryAggregator::new("update-form-elements");
        let only = summary("set-form-representations", Some("en"), &["foo"]);
        assert_eq!(aggregator.aggregate(&[Summary::new(), only.clone()]), only);
    }

    #[test]
    fn test_same_action_merges_args() {
        let aggregator = SummaryAggregator::new("update-form-elements");
        let merged = aggregator.aggregate(&[
            summary("set-form-representations", Some("en"), &["foo"]),
            summary("set-form-representations", Some("de"), &["Foo"]),
        ]);
        assert_eq!(merged.action(), Some("set-form-representations"));
        assert_eq!(merged.language(), None);
        assert_eq!(merged.args(), &["foo".to_string(), "Foo".to_string()]);
    }

    #[test]
    fn test_mixed_actions_fall_back() {
        let aggregator = SummaryAggregator::new("update-form-elements");
        let merged = aggregator.aggregate(&[
            summary("set-form-representations", Some("en"), &["foo"]),
            summary("add-form-grammatical-features", Some("en"), &["Q1"]),
        ]);
        assert_eq!(merged.action(), Some("update-form-elements"));
        assert_eq!(merged.language(), Some("en"));
        assert!(merged.args().is_empty());
    }
}
