use serde::Serialize;
use tracing::debug;

use crate::merge::WorkingQuestion;
use crate::spec::QuestionKind;

/// Outcome of the gradient gate run before any export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GradientValidation {
    pub valid: bool,
    /// Questions a host should highlight.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_ids: Vec<String>,
}

impl GradientValidation {
    pub fn is_flagged(&self, id: &str) -> bool {
        self.invalid_ids.iter().any(|flagged| flagged == id)
    }
}

/// Requires both measurements on every gradient question answered `yes`.
///
/// No other kind is checked; unanswered questions are always acceptable.
pub fn validate_gradients(questions: &[WorkingQuestion]) -> GradientValidation {
    let invalid_ids = questions
        .iter()
        .filter(|working| {
            working.question.kind == QuestionKind::Gradient && working.answer.response == "yes"
        })
        .filter(|working| {
            parse_measurement(&working.answer.height).is_none()
                || parse_measurement(&working.answer.length).is_none()
        })
        .map(|working| working.id().to_string())
        .collect::<Vec<_>>();

    if !invalid_ids.is_empty() {
        debug!(invalid = ?invalid_ids, "gradient questions are missing measurements");
    }

    GradientValidation {
        valid: invalid_ids.is_empty(),
        invalid_ids,
    }
}

/// Parses a measurement field; blank text and non-finite values are rejected.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
