use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::answers::{Answer, normalize};
use crate::export::ExportError;
use crate::gallery::collect_gallery;
use crate::layout::{DisplayItem, ShownDuplicates, compute_visible_list};
use crate::merge::{HiddenIds, WorkingQuestion, merge, to_answer_records};
use crate::report::{ReportDocument, build_report};
use crate::spec::{QuestionKind, QuestionSchema};
use crate::store::{AnswerStore, ImageSource, ImageStore, StoreError};
use crate::validate::{GradientValidation, validate_gradients};
use crate::visibility::{HiddenSet, compute_hidden};

/// Errors raised by session operations. None of them invalidate the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("'{value}' is not an answer to '{id}'; expected one of: {choices}")]
    InvalidChoice {
        id: String,
        value: String,
        choices: String,
    },
    #[error("question '{0}' does not accept images")]
    NotAnImageQuestion(String),
    #[error("The selected image is {size_kb} KB. Please choose an image under {limit_kb} KB.")]
    UploadTooLarge { size_kb: usize, limit_kb: usize },
    #[error("question '{id}' has no image at index {index}")]
    ImageIndex { id: String, index: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of writing the working list back to the answer store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// The write failed; the in-memory answers stay authoritative.
    Failed { reason: String },
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// One user's questionnaire session: the working list, expanded duplicate
/// groups and the answer store every committed edit is written to.
#[derive(Debug)]
pub struct AuditSession<S> {
    schema: QuestionSchema,
    hidden_ids: HiddenIds,
    questions: Vec<WorkingQuestion>,
    index: BTreeMap<String, usize>,
    shown: ShownDuplicates,
    store: S,
}

impl<S: AnswerStore> AuditSession<S> {
    /// Loads stored answers and merges them into `schema`.
    pub fn open(schema: QuestionSchema, store: S, hidden_ids: HiddenIds) -> Self {
        let records = store.load();
        let questions = merge(&schema, &records, &hidden_ids);
        info!(questions = questions.len(), "opened audit session");
        let mut session = Self {
            schema,
            hidden_ids,
            questions,
            index: BTreeMap::new(),
            shown: ShownDuplicates::new(),
            store,
        };
        session.reindex();
        session
    }

    pub fn questions(&self) -> &[WorkingQuestion] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&WorkingQuestion> {
        self.index.get(id).map(|&slot| &self.questions[slot])
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn shown_duplicates(&self) -> &ShownDuplicates {
        &self.shown
    }

    pub fn hidden(&self) -> HiddenSet {
        compute_hidden(&self.questions)
    }

    /// Display list for the current answers and expanded groups.
    pub fn display_list(&self) -> Vec<DisplayItem> {
        compute_visible_list(&self.questions, &self.hidden(), &self.shown)
    }

    /// Flips the second instance of `group`; returns whether it is now shown.
    pub fn toggle_duplicate(&mut self, group: &str) -> bool {
        if self.shown.remove(group) {
            false
        } else {
            self.shown.insert(group.to_string());
            true
        }
    }

    pub fn expand_duplicate(&mut self, group: impl Into<String>) {
        self.shown.insert(group.into());
    }

    /// Sets the response. Choice questions store the matching option as
    /// written in the schema; blank input clears the answer.
    pub fn set_response(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<SaveStatus, SessionError> {
        let value = self.resolve_choice(id, value.into())?;
        self.edit(id, |answer| answer.response = value)
    }

    pub fn set_detail(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<SaveStatus, SessionError> {
        let value = value.into();
        self.edit(id, |answer| answer.response_detail = value)
    }

    pub fn set_height(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<SaveStatus, SessionError> {
        let value = value.into();
        self.edit(id, |answer| answer.height = value)
    }

    pub fn set_length(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<SaveStatus, SessionError> {
        let value = value.into();
        self.edit(id, |answer| answer.length = value)
    }

    /// Stores an uploaded image and appends it to the question's list.
    ///
    /// Oversized uploads are rejected before any store is touched.
    pub fn attach_image<I>(
        &mut self,
        id: &str,
        bytes: &[u8],
        images: &mut I,
        max_bytes: usize,
    ) -> Result<SaveStatus, SessionError>
    where
        I: ImageStore + ?Sized,
    {
        let slot = self.image_slot(id)?;
        if bytes.len() > max_bytes {
            return Err(SessionError::UploadTooLarge {
                size_kb: (bytes.len() + 512) / 1024,
                limit_kb: max_bytes / 1024,
            });
        }

        let stored_id = format!("{id}-{}", uuid::Uuid::new_v4().simple());
        let reference = images.save(bytes, &stored_id)?;
        debug!(question = id, image = %reference, "attached image");
        self.questions[slot].answer.image_list.push(reference);
        Ok(self.commit())
    }

    /// Deletes the stored file and drops it from the question's list.
    pub fn remove_image<I>(
        &mut self,
        id: &str,
        index: usize,
        images: &mut I,
    ) -> Result<SaveStatus, SessionError>
    where
        I: ImageStore + ?Sized,
    {
        let slot = self.image_slot(id)?;
        let list = &mut self.questions[slot].answer.image_list;
        if index >= list.len() {
            return Err(SessionError::ImageIndex {
                id: id.to_string(),
                index,
            });
        }
        let reference = list.remove(index);
        if let Err(err) = images.delete(&reference) {
            warn!(image = %reference, error = %err, "stored image could not be deleted");
        }
        Ok(self.commit())
    }

    pub fn validate(&self) -> GradientValidation {
        validate_gradients(&self.questions)
    }

    /// Read-only copy of the working list for export.
    pub fn snapshot(&self) -> Vec<WorkingQuestion> {
        self.questions.clone()
    }

    /// Runs the gradient gate, then builds the report document and its gallery.
    pub fn build_report(
        &self,
        source: &dyn ImageSource,
        max_images: usize,
    ) -> Result<ReportDocument, ExportError> {
        let validation = self.validate();
        if !validation.valid {
            return Err(ExportError::IncompleteGradients(validation.invalid_ids));
        }
        let snapshot = self.snapshot();
        let gallery = collect_gallery(&snapshot, source, max_images);
        let document = build_report(&snapshot).with_gallery(gallery);
        info!(
            rows = document.row_count(),
            images = document.gallery.len(),
            "built report document"
        );
        Ok(document)
    }

    /// Removes every answer and stored image and resets the working list.
    pub fn clear<I>(&mut self, images: &mut I) -> Result<(), SessionError>
    where
        I: ImageStore + ?Sized,
    {
        self.store.clear()?;
        self.questions = merge(&self.schema, &[], &self.hidden_ids);
        self.shown.clear();
        self.reindex();
        images.clear()?;
        info!("cleared answers and images");
        Ok(())
    }

    /// Writes the entire working list to the store.
    pub fn commit(&mut self) -> SaveStatus {
        let records = to_answer_records(&self.questions);
        match self.store.save(&records) {
            Ok(()) => {
                debug!(records = records.len(), "saved answers");
                SaveStatus::Saved
            }
            Err(err) => {
                warn!(error = %err, "failed to save answers");
                SaveStatus::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn edit<F>(&mut self, id: &str, apply: F) -> Result<SaveStatus, SessionError>
    where
        F: FnOnce(&mut Answer),
    {
        let slot = self.slot(id)?;
        apply(&mut self.questions[slot].answer);
        Ok(self.commit())
    }

    fn slot(&self, id: &str) -> Result<usize, SessionError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| SessionError::UnknownQuestion(id.to_string()))
    }

    fn resolve_choice(&self, id: &str, value: String) -> Result<String, SessionError> {
        let choices = self.questions[self.slot(id)?].question.choices();
        let wanted = normalize(&value);
        if wanted.is_empty() {
            return Ok(String::new());
        }
        if choices.is_empty() {
            return Ok(value);
        }
        choices
            .iter()
            .find(|choice| normalize(choice) == wanted)
            .cloned()
            .ok_or_else(|| SessionError::InvalidChoice {
                id: id.to_string(),
                value,
                choices: choices.join(", "),
            })
    }

    fn image_slot(&self, id: &str) -> Result<usize, SessionError> {
        let slot = self.slot(id)?;
        if self.questions[slot].question.kind != QuestionKind::Image {
            return Err(SessionError::NotAnImageQuestion(id.to_string()));
        }
        Ok(slot)
    }

    fn reindex(&mut self) {
        self.index = self
            .questions
            .iter()
            .enumerate()
            .map(|(slot, working)| (working.id().to_string(), slot))
            .collect();
    }
}
