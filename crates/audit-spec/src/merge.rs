use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::answers::{Answer, AnswerRecord};
use crate::spec::{Question, QuestionSchema};

/// Retired question ids that never reach a session.
pub const DEFAULT_HIDDEN_IDS: &[&str] = &[
    "q159", "q160", "q172", "q173", "q174", "q126", "q135", "q185",
];

/// A schema question paired with its current answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingQuestion {
    #[serde(flatten)]
    pub question: Question,
    #[serde(flatten)]
    pub answer: Answer,
}

impl WorkingQuestion {
    pub fn unanswered(question: Question) -> Self {
        Self {
            question,
            answer: Answer::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.question.id
    }
}

/// Static exclusion list applied before merge output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenIds(BTreeSet<String>);

impl HiddenIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    /// The retired ids shipped with the accessibility questionnaire.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_HIDDEN_IDS.iter().copied())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }
}

/// Combines schema and stored answers into the working list, preserving schema order.
pub fn merge(
    schema: &QuestionSchema,
    records: &[AnswerRecord],
    hidden: &HiddenIds,
) -> Vec<WorkingQuestion> {
    let mut by_id: BTreeMap<&str, &AnswerRecord> = BTreeMap::new();
    for record in records {
        if by_id.contains_key(record.id.as_str()) {
            warn!(id = %record.id, "duplicate stored answer; keeping the first record");
            continue;
        }
        by_id.insert(record.id.as_str(), record);
    }

    let merged = schema
        .questions
        .iter()
        .filter(|question| !hidden.contains(&question.id))
        .map(|question| {
            let mut working = WorkingQuestion::unanswered(question.clone());
            if let Some(record) = by_id.get(question.id.as_str()) {
                working.answer.overlay(record);
            }
            working
        })
        .collect::<Vec<_>>();

    debug!(
        questions = merged.len(),
        records = records.len(),
        "merged answers into questionnaire"
    );
    merged
}

/// Full-overwrite payload written back to the answer store.
pub fn to_answer_records(questions: &[WorkingQuestion]) -> Vec<AnswerRecord> {
    questions
        .iter()
        .map(|working| working.answer.to_record(working.id()))
        .collect()
}
