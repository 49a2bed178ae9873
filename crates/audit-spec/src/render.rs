use serde_json::{Value, json};

use crate::layout::{DisplayItem, InputControl};

/// Render the display list as a structured JSON-friendly value.
pub fn render_json_ui(items: &[DisplayItem]) -> Value {
    let questions = items
        .iter()
        .filter(|item| matches!(item, DisplayItem::Question { .. }))
        .count();
    let answered = items.iter().filter(|item| is_answered(item)).count();
    json!({
        "progress": {
            "answered": answered,
            "total": questions,
        },
        "items": items,
    })
}

/// Render the display list as human-friendly text.
pub fn render_text(items: &[DisplayItem]) -> String {
    let mut lines = Vec::new();
    for item in items {
        match item {
            DisplayItem::Heading { title, .. } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(format!("== {title} =="));
            }
            DisplayItem::Question {
                id,
                label,
                question_type,
                input,
            } => {
                let mut entry = format!(" - {id} [{}] {label}", question_type.as_str());
                if let Some(value) = describe_input(input) {
                    entry.push_str(&format!(" = {value}"));
                }
                lines.push(entry);
            }
            DisplayItem::DuplicateToggle { group, label, .. } => {
                lines.push(format!("   ({label}: --expand \"{group}\")"));
            }
        }
    }
    lines.join("\n")
}

fn describe_input(input: &InputControl) -> Option<String> {
    match input {
        InputControl::Choice {
            selected, detail, ..
        } => {
            let selected = selected.clone()?;
            match detail.as_deref() {
                Some(detail) if !detail.is_empty() => Some(format!("{selected} ({detail})")),
                _ => Some(selected),
            }
        }
        InputControl::Gradient {
            selected,
            height,
            length,
            ..
        } => {
            let selected = selected.clone()?;
            if height.is_empty() && length.is_empty() {
                Some(selected)
            } else {
                Some(format!("{selected} (height {height}, length {length})"))
            }
        }
        InputControl::Images { images } if !images.is_empty() => {
            Some(format!("{} image(s)", images.len()))
        }
        InputControl::Images { .. } => None,
        InputControl::Text { value, .. } if !value.is_empty() => Some(value.clone()),
        InputControl::Text { .. } => None,
    }
}

fn is_answered(item: &DisplayItem) -> bool {
    match item {
        DisplayItem::Question { input, .. } => describe_input(input).is_some(),
        _ => false,
    }
}
