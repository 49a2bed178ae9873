#![allow(missing_docs)]

pub mod answers;
pub mod export;
pub mod gallery;
pub mod layout;
pub mod merge;
pub mod render;
pub mod report;
pub mod session;
pub mod spec;
pub mod store;
pub mod validate;
pub mod visibility;

pub use answers::{Answer, AnswerRecord, normalize, parse_answer_records, parse_answer_records_str};
pub use export::{
    ExportError, GalleryRow, HtmlReportRenderer, PdfPrinter, TemplateError, WidgetPackager,
    WidgetPosition, gallery_rows,
};
pub use gallery::{GalleryImage, MAX_GALLERY_IMAGES, collect_gallery, data_uri};
pub use layout::{
    DisplayItem, FocusHint, InputControl, ShownDuplicates, compute_visible_list, locate_focus,
    toggle_label,
};
pub use merge::{DEFAULT_HIDDEN_IDS, HiddenIds, WorkingQuestion, merge, to_answer_records};
pub use render::{render_json_ui, render_text};
pub use report::{
    DEFAULT_SECTION, ReportDocument, ReportEntry, ReportSection, build_report, gradient_ratio,
};
pub use session::{AuditSession, SaveStatus, SessionError};
pub use spec::{Question, QuestionKind, QuestionSchema, SchemaError, SkipLogic};
pub use store::{
    AnswerStore, FsImageSource, ImageSource, ImageStore, MAX_UPLOAD_BYTES, MemoryAnswerStore,
    MemoryImageStore, StoreError,
};
pub use validate::{GradientValidation, parse_measurement, validate_gradients};
pub use visibility::{HiddenSet, compute_hidden};
