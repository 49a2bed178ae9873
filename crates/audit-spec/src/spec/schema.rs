use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::question::Question;

/// Ordered questionnaire definition, stored on disk as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct QuestionSchema {
    pub questions: Vec<Question>,
}

/// Errors raised while loading a questionnaire definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("questionnaire is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question id '{0}' is defined more than once")]
    DuplicateId(String),
}

impl QuestionSchema {
    /// Builds a schema and rejects duplicate ids.
    pub fn new(questions: Vec<Question>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(SchemaError::DuplicateId(question.id.clone()));
            }
        }
        Ok(Self { questions })
    }

    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// JSON schema describing the questionnaire file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(QuestionSchema)).unwrap_or_default()
    }
}
