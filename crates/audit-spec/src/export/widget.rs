use std::fmt;
use std::str::FromStr;

use handlebars::Handlebars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::{ExportError, TemplateError, engine};
use crate::report::{ReportDocument, ReportEntry};

const TEMPLATE_NAME: &str = "widget";

/// Where the widget places its launcher button.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
    /// No button; the page supplies an element with id `open-widget`.
    Manual,
}

impl WidgetPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetPosition::BottomLeft => "bottom-left",
            WidgetPosition::BottomCenter => "bottom-center",
            WidgetPosition::BottomRight => "bottom-right",
            WidgetPosition::Manual => "manual",
        }
    }
}

impl fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "bottom-left" => Ok(WidgetPosition::BottomLeft),
            "bottom-center" => Ok(WidgetPosition::BottomCenter),
            "bottom-right" => Ok(WidgetPosition::BottomRight),
            "manual" => Ok(WidgetPosition::Manual),
            other => Err(format!(
                "unknown widget position '{other}' (expected bottom-left, bottom-center, bottom-right or manual)"
            )),
        }
    }
}

/// Packages a report into a self-contained JavaScript file.
pub struct WidgetPackager {
    handlebars: Handlebars<'static>,
}

impl WidgetPackager {
    pub fn new() -> Result<Self, TemplateError> {
        let handlebars = engine(TEMPLATE_NAME, include_str!("../../templates/widget.js.hbs"))?;
        Ok(Self { handlebars })
    }

    pub fn package(
        &self,
        document: &ReportDocument,
        position: WidgetPosition,
    ) -> Result<String, ExportError> {
        let sections = widget_data(document);
        let gallery: Vec<Value> = document
            .gallery
            .iter()
            .map(|image| json!({ "src": image.data_uri, "label": image.caption }))
            .collect();
        debug!(
            sections = sections.len(),
            images = gallery.len(),
            %position,
            "packaging widget"
        );

        // JSON literals go into the script through triple-stache, unescaped.
        let data = json!({
            "data": serde_json::to_string(&sections)?,
            "gallery": serde_json::to_string(&gallery)?,
            "position": serde_json::to_string(position.as_str())?,
        });
        let script = self
            .handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|err| TemplateError::Render(err.to_string()))?;
        Ok(script)
    }
}

fn widget_data(document: &ReportDocument) -> Vec<Value> {
    document
        .widget_sections()
        .into_iter()
        .map(|section| {
            let entries: Vec<Value> = section
                .entries
                .iter()
                .map(|entry| match entry {
                    ReportEntry::Subheading { label, .. } => {
                        json!({ "kind": "subheading", "label": label })
                    }
                    ReportEntry::Row {
                        label,
                        answer,
                        detail,
                        ..
                    } => json!({
                        "kind": "row",
                        "label": label,
                        "answer": answer,
                        "detail": detail,
                    }),
                })
                .collect();
            json!({ "heading": section.heading, "entries": entries })
        })
        .collect()
}
