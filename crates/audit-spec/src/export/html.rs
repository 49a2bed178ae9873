use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::{TemplateError, engine};
use crate::gallery::{GalleryImage, MAX_GALLERY_IMAGES};
use crate::report::ReportDocument;

const TEMPLATE_NAME: &str = "report";
const IMAGES_PER_ROW: usize = 2;
const ROWS_PER_PAGE: usize = 3;

/// One row of the printed gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryRow {
    pub images: Vec<GalleryImage>,
    /// A page break is emitted before this row.
    pub page_break: bool,
    /// The row has a single image and needs an empty trailing cell.
    pub padded: bool,
}

/// Renders the paginated HTML page that is printed to PDF.
pub struct HtmlReportRenderer {
    handlebars: Handlebars<'static>,
}

impl HtmlReportRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let handlebars = engine(TEMPLATE_NAME, include_str!("../../templates/report.html.hbs"))?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, document: &ReportDocument) -> Result<String, TemplateError> {
        let rows = gallery_rows(&document.gallery);
        let entries: Vec<_> = document.pdf_entries().collect();
        debug!(
            gallery_rows = rows.len(),
            entries = entries.len(),
            "rendering html report"
        );
        let data = json!({
            "max_images": MAX_GALLERY_IMAGES,
            "gallery_rows": rows,
            "entries": entries,
        });
        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|err| TemplateError::Render(err.to_string()))
    }
}

/// Pairs gallery images into rows, breaking the page before every third row.
pub fn gallery_rows(gallery: &[GalleryImage]) -> Vec<GalleryRow> {
    gallery
        .chunks(IMAGES_PER_ROW)
        .enumerate()
        .map(|(row, images)| GalleryRow {
            images: images.to_vec(),
            page_break: row > 0 && row % ROWS_PER_PAGE == 0,
            padded: images.len() < IMAGES_PER_ROW,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(n: usize) -> GalleryImage {
        GalleryImage {
            data_uri: format!("data:image/jpeg;base64,{n}"),
            caption: "Entrance".into(),
        }
    }

    #[test]
    fn rows_pair_images_and_break_every_third_row() {
        let gallery: Vec<_> = (0..13).map(image).collect();
        let rows = gallery_rows(&gallery);
        assert_eq!(rows.len(), 7);
        let breaks: Vec<_> = rows.iter().map(|row| row.page_break).collect();
        assert_eq!(breaks, [false, false, false, true, false, false, true]);
        assert!(rows[6].padded);
        assert!(!rows[0].padded);
    }
}
