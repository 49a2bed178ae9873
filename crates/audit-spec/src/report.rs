use std::collections::BTreeMap;

use serde::Serialize;

use crate::answers::normalize;
use crate::gallery::GalleryImage;
use crate::merge::WorkingQuestion;
use crate::spec::QuestionKind;
use crate::validate::parse_measurement;

/// Section name used for questions without a group.
pub const DEFAULT_SECTION: &str = "General";

/// One line of a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    /// Section break produced by a heading question.
    Subheading {
        label: String,
        /// Whether an answered question follows before the next heading or group change.
        has_content_below: bool,
    },
    Row {
        label: String,
        answer: String,
        detail: String,
        /// The label textually repeats the section heading.
        repeats_heading: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    pub entries: Vec<ReportEntry>,
}

/// Renderer-agnostic export document shared by the PDF and widget paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub sections: Vec<ReportSection>,
    pub gallery: Vec<GalleryImage>,
}

impl ReportDocument {
    pub fn with_gallery(mut self, gallery: Vec<GalleryImage>) -> Self {
        self.gallery = gallery;
        self
    }

    /// Every entry in document order, as the paginated report lists them.
    pub fn pdf_entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.sections.iter().flat_map(|section| section.entries.iter())
    }

    /// Sections as the widget shows them: empty subheadings and rows repeating
    /// their heading are dropped, then sections left empty.
    pub fn widget_sections(&self) -> Vec<ReportSection> {
        self.sections
            .iter()
            .map(|section| ReportSection {
                heading: section.heading.clone(),
                entries: section
                    .entries
                    .iter()
                    .filter(|entry| match entry {
                        ReportEntry::Subheading {
                            has_content_below, ..
                        } => *has_content_below,
                        ReportEntry::Row {
                            repeats_heading, ..
                        } => !repeats_heading,
                    })
                    .cloned()
                    .collect(),
            })
            .filter(|section| !section.entries.is_empty())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.pdf_entries()
            .filter(|entry| matches!(entry, ReportEntry::Row { .. }))
            .count()
    }
}

/// Groups answered questions by section and formats their answer cells.
///
/// Image questions are left to the gallery pass.
pub fn build_report(questions: &[WorkingQuestion]) -> ReportDocument {
    let mut sections: Vec<ReportSection> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for (position, working) in questions.iter().enumerate() {
        let question = &working.question;
        if question.kind == QuestionKind::Image {
            continue;
        }
        if !working.answer.has_content() && !question.is_heading {
            continue;
        }

        let heading = question.group.as_deref().unwrap_or(DEFAULT_SECTION);
        let slot = *index.entry(heading.to_string()).or_insert_with(|| {
            sections.push(ReportSection {
                heading: heading.to_string(),
                entries: Vec::new(),
            });
            sections.len() - 1
        });

        let entry = if question.is_heading {
            ReportEntry::Subheading {
                label: question.heading_label().to_string(),
                has_content_below: has_content_below(questions, position),
            }
        } else {
            let label = question.report_label().to_string();
            let (answer, detail) = format_cells(working);
            ReportEntry::Row {
                repeats_heading: normalize(&label) == normalize(heading),
                label,
                answer,
                detail,
            }
        };
        sections[slot].entries.push(entry);
    }

    ReportDocument {
        sections,
        gallery: Vec::new(),
    }
}

/// `1 : N` slope for a ramp, when both measurements are positive numbers.
pub fn gradient_ratio(height: &str, length: &str) -> Option<String> {
    let height = parse_measurement(height)?;
    let length = parse_measurement(length)?;
    if height <= 0.0 || length <= 0.0 {
        return None;
    }
    let ratio = (length / height).round();
    if !ratio.is_finite() || ratio > i64::MAX as f64 {
        return None;
    }
    Some(format!("1 : {}", ratio as i64))
}

fn format_cells(working: &WorkingQuestion) -> (String, String) {
    let answer = &working.answer;
    let kind = working.question.kind;

    if kind.is_yes_no_family() {
        return (capitalize(&answer.response), answer.response_detail.clone());
    }
    if kind.is_detail_typed() {
        return (String::new(), answer.response.clone());
    }
    if kind == QuestionKind::Gradient && answer.response == "yes" {
        let detail = gradient_ratio(&answer.height, &answer.length)
            .unwrap_or_else(|| answer.response_detail.clone());
        return ("Yes".to_string(), detail);
    }
    (answer.response.clone(), answer.response_detail.clone())
}

fn has_content_below(questions: &[WorkingQuestion], position: usize) -> bool {
    let group = &questions[position].question.group;
    questions[position + 1..]
        .iter()
        .take_while(|next| !next.question.is_heading && next.question.group == *group)
        .any(|next| next.answer.has_content())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_rounds_to_nearest_integer() {
        assert_eq!(gradient_ratio("500", "5000").as_deref(), Some("1 : 10"));
        assert_eq!(gradient_ratio("300", "3500").as_deref(), Some("1 : 12"));
        assert_eq!(gradient_ratio("0", "5000"), None);
        assert_eq!(gradient_ratio("500", ""), None);
        assert_eq!(gradient_ratio("1", "inf"), None);
        assert_eq!(gradient_ratio("1e-300", "1e300"), None);
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize("partial"), "Partial");
        assert_eq!(capitalize(""), "");
    }
}
