use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Persisted answer for one question, keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_detail: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_list: Option<Vec<String>>,
}

/// In-memory answer state of a working question. Absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub response_detail: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub image_list: Vec<String>,
}

impl Answer {
    /// True when any tabular field carries text; images are not considered.
    pub fn has_content(&self) -> bool {
        !self.response.is_empty()
            || !self.response_detail.is_empty()
            || !self.height.is_empty()
            || !self.length.is_empty()
    }

    /// Overlays the fields present in `record`; the record wins on conflicts.
    pub fn overlay(&mut self, record: &AnswerRecord) {
        if let Some(response) = &record.response {
            self.response = response.clone();
        }
        if let Some(detail) = &record.response_detail {
            self.response_detail = detail.clone();
        }
        if let Some(height) = &record.height {
            self.height = height.clone();
        }
        if let Some(length) = &record.length {
            self.length = length.clone();
        }
        if let Some(images) = &record.image_list {
            self.image_list = images.clone();
        }
    }

    /// Normalized response used by skip rules and toggle checks.
    pub fn normalized_response(&self) -> String {
        normalize(&self.response)
    }

    pub fn to_record(&self, id: &str) -> AnswerRecord {
        AnswerRecord {
            id: id.to_string(),
            response: non_empty(&self.response),
            response_detail: non_empty(&self.response_detail),
            height: non_empty(&self.height),
            length: non_empty(&self.length),
            image_list: (!self.image_list.is_empty()).then(|| self.image_list.clone()),
        }
    }
}

/// Lowercases and trims an answer for comparisons.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Reads a stored answers document. Anything other than an array degrades to no answers.
pub fn parse_answer_records(value: &Value) -> Vec<AnswerRecord> {
    let Some(entries) = value.as_array() else {
        warn!("stored answers are not an array; starting with no answers");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            match serde_json::from_value::<AnswerRecord>(entry.clone()) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(index = idx, error = %err, "skipping unreadable answer record");
                    None
                }
            }
        })
        .collect()
}

/// Same as [`parse_answer_records`] but starting from raw text.
pub fn parse_answer_records_str(raw: &str) -> Vec<AnswerRecord> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => parse_answer_records(&value),
        Err(err) => {
            warn!(error = %err, "stored answers are not valid json; starting with no answers");
            Vec::new()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_measurements_are_read_as_strings() {
        let records = parse_answer_records(&json!([
            { "id": "q1", "response": "yes", "height": 500, "length": "5000" }
        ]));
        assert_eq!(records[0].height.as_deref(), Some("500"));
        assert_eq!(records[0].length.as_deref(), Some("5000"));
    }

    #[test]
    fn numeric_detail_keeps_the_record() {
        let records = parse_answer_records(&json!([
            { "id": "q15", "response": "yes", "responseDetail": 850 }
        ]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].response.as_deref(), Some("yes"));
        assert_eq!(records[0].response_detail.as_deref(), Some("850"));
    }

    #[test]
    fn object_document_degrades_to_empty() {
        assert!(parse_answer_records(&json!({ "q1": "yes" })).is_empty());
        assert!(parse_answer_records_str("not json").is_empty());
    }

    #[test]
    fn records_without_id_are_skipped() {
        let records = parse_answer_records(&json!([{ "response": "yes" }, { "id": "q2" }]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "q2");
    }

    #[test]
    fn whole_question_objects_are_accepted() {
        let records = parse_answer_records(&json!([
            { "id": "q1", "type": "y/n", "question": "Ramp?", "response": "no", "isHeading": false }
        ]));
        assert_eq!(records[0].response.as_deref(), Some("no"));
    }
}
