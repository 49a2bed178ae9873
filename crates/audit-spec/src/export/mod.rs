//! Report renderers for the paginated PDF path and the embeddable widget.

mod html;
mod widget;

use std::io;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use thiserror::Error;

pub use html::{GalleryRow, HtmlReportRenderer, gallery_rows};
pub use widget::{WidgetPackager, WidgetPosition};

/// Errors raised while loading or rendering export templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to register template '{name}': {message}")]
    Register { name: &'static str, message: String },
    #[error("template render error: {0}")]
    Render(String),
}

/// Errors raised while exporting a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please enter height and length for all ramps marked Yes. ({})", .0.join(", "))]
    IncompleteGradients(Vec<String>),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("failed to serialize export data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("pdf printer failed: {0}")]
    Print(String),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Converts a rendered HTML page into a PDF at `output`.
pub trait PdfPrinter {
    fn print(&self, html: &str, output: &Path) -> Result<(), ExportError>;
}

fn engine(name: &'static str, source: &str) -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string(name, source)
        .map_err(|err| TemplateError::Register {
            name,
            message: err.to_string(),
        })?;
    Ok(handlebars)
}
