use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::warn;

use crate::merge::WorkingQuestion;
use crate::report::DEFAULT_SECTION;
use crate::spec::QuestionKind;
use crate::store::ImageSource;

/// Most images embedded in one report.
pub const MAX_GALLERY_IMAGES: usize = 24;

/// Embedded image with its section caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub data_uri: String,
    pub caption: String,
}

/// Loads every attached image in schema order, skipping unreadable files, up to `cap`.
pub fn collect_gallery(
    questions: &[WorkingQuestion],
    source: &dyn ImageSource,
    cap: usize,
) -> Vec<GalleryImage> {
    let mut gallery = Vec::new();

    let attachments = questions
        .iter()
        .filter(|working| working.question.kind == QuestionKind::Image)
        .flat_map(|working| {
            let caption = working
                .question
                .group
                .as_deref()
                .unwrap_or(DEFAULT_SECTION);
            working
                .answer
                .image_list
                .iter()
                .map(move |reference| (reference, caption))
        });

    for (reference, caption) in attachments {
        if gallery.len() >= cap {
            break;
        }
        match source.read(reference) {
            Ok(bytes) => gallery.push(GalleryImage {
                data_uri: data_uri(reference, &bytes),
                caption: caption.to_string(),
            }),
            Err(err) => {
                warn!(image = %reference, error = %err, "skipping image that could not be read");
            }
        }
    }

    gallery
}

/// Encodes image bytes as a `data:` URI, typed from the file extension.
pub fn data_uri(reference: &str, bytes: &[u8]) -> String {
    format!(
        "data:image/{};base64,{}",
        mime_subtype(reference),
        STANDARD.encode(bytes)
    )
}

fn mime_subtype(reference: &str) -> &'static str {
    let extension = Path::new(reference)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "png",
        Some("gif") => "gif",
        Some("webp") => "webp",
        Some("bmp") => "bmp",
        Some("svg") => "svg+xml",
        _ => "jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_follows_extension() {
        assert!(data_uri("a/b.PNG", b"x").starts_with("data:image/png;base64,"));
        assert!(data_uri("a/b.jpg", b"x").starts_with("data:image/jpeg;base64,"));
        assert_eq!(data_uri("noext", b"hi"), "data:image/jpeg;base64,aGk=");
    }
}
