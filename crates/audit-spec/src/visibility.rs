use std::collections::{BTreeMap, BTreeSet};

use crate::answers::normalize;
use crate::merge::WorkingQuestion;

/// Ids hidden by skip rules for the current answers. Derived, never persisted.
pub type HiddenSet = BTreeSet<String>;

/// Evaluates every skip rule against the current answers in a single pass.
///
/// Rules do not cascade: a question hidden by another rule still fires its own
/// rule from its stored answer.
pub fn compute_hidden(questions: &[WorkingQuestion]) -> HiddenSet {
    let responses: BTreeMap<&str, String> = questions
        .iter()
        .map(|working| (working.id(), working.answer.normalized_response()))
        .collect();

    let mut hidden = HiddenSet::new();
    for working in questions {
        let Some(rule) = &working.question.skip_logic else {
            continue;
        };
        let expected = normalize(&rule.value);
        if expected.is_empty() {
            continue;
        }
        let actual = responses.get(working.id()).map(String::as_str).unwrap_or("");
        if actual == expected {
            hidden.extend(rule.skip.iter().cloned());
        }
    }

    hidden
}
