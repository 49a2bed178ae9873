use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported question kinds, serialized with the strings the questionnaire file uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum QuestionKind {
    #[serde(rename = "y/n")]
    YesNo,
    #[serde(rename = "y/n/p")]
    YesNoPartial,
    #[serde(rename = "y/n/t")]
    YesNoDetail,
    #[serde(rename = "option")]
    Option,
    #[serde(rename = "gradient")]
    Gradient,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "text")]
    #[default]
    Text,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "measure")]
    Measure,
}

impl QuestionKind {
    /// Yes/no style kinds; the first one in a duplicate group controls its toggle.
    pub fn is_yes_no_family(self) -> bool {
        matches!(
            self,
            QuestionKind::YesNo | QuestionKind::YesNoPartial | QuestionKind::YesNoDetail
        )
    }

    /// Kinds whose raw response is reported in the detail column.
    pub fn is_detail_typed(self) -> bool {
        matches!(
            self,
            QuestionKind::Measure | QuestionKind::Number | QuestionKind::Option
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::YesNo => "y/n",
            QuestionKind::YesNoPartial => "y/n/p",
            QuestionKind::YesNoDetail => "y/n/t",
            QuestionKind::Option => "option",
            QuestionKind::Gradient => "gradient",
            QuestionKind::Image => "image",
            QuestionKind::Text => "text",
            QuestionKind::Number => "number",
            QuestionKind::Measure => "measure",
        }
    }
}

/// Hides `skip` whenever the owning question's answer matches `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkipLogic {
    pub value: String,
    #[serde(default)]
    pub skip: Vec<String>,
}

/// Definition of a single questionnaire entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// Headings may omit the type; they read as `text`.
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub is_heading: bool,
    #[serde(default)]
    pub duplicate_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_logic: Option<SkipLogic>,
    /// Comma separated choices for `option` questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, kind: QuestionKind, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            question: question.into(),
            output_label: None,
            group: None,
            is_heading: false,
            duplicate_group: false,
            instance: None,
            skip_logic: None,
            conditional: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn heading(mut self) -> Self {
        self.is_heading = true;
        self
    }

    pub fn with_output_label(mut self, label: impl Into<String>) -> Self {
        self.output_label = Some(label.into());
        self
    }

    pub fn with_skip_logic(mut self, value: impl Into<String>, skip: &[&str]) -> Self {
        self.skip_logic = Some(SkipLogic {
            value: value.into(),
            skip: skip.iter().map(|id| id.to_string()).collect(),
        });
        self
    }

    pub fn with_instance(mut self, instance: u8) -> Self {
        self.duplicate_group = true;
        self.instance = Some(instance);
        self
    }

    pub fn with_choices(mut self, conditional: impl Into<String>) -> Self {
        self.conditional = Some(conditional.into());
        self
    }

    /// Choices offered by radio-style inputs; empty for free-form kinds.
    pub fn choices(&self) -> Vec<String> {
        match self.kind {
            QuestionKind::YesNo | QuestionKind::YesNoDetail | QuestionKind::Gradient => {
                vec!["yes".into(), "no".into()]
            }
            QuestionKind::YesNoPartial => vec!["yes".into(), "no".into(), "partial".into()],
            QuestionKind::Option => self
                .conditional
                .as_deref()
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|choice| !choice.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            QuestionKind::Image | QuestionKind::Text | QuestionKind::Number | QuestionKind::Measure => {
                Vec::new()
            }
        }
    }

    pub fn is_second_instance(&self) -> bool {
        self.instance == Some(2)
    }

    pub fn is_first_instance(&self) -> bool {
        self.instance == Some(1)
    }

    /// Label used in exported reports for answer rows.
    pub fn report_label(&self) -> &str {
        self.output_label.as_deref().unwrap_or(&self.question)
    }

    /// Label used in exported reports for section breaks.
    pub fn heading_label(&self) -> &str {
        non_empty(self.output_label.as_deref())
            .or_else(|| non_empty(Some(self.question.as_str())))
            .or_else(|| non_empty(self.group.as_deref()))
            .unwrap_or("Section")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
