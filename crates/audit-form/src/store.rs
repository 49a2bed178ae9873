//! File-backed answer and image stores.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use audit_spec::{AnswerRecord, AnswerStore, ImageStore, StoreError, parse_answer_records_str};
use tracing::{debug, warn};

pub const ANSWERS_FILE: &str = "answers.json";
pub const IMAGES_DIR: &str = "user_images";

/// Answers kept as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonAnswerStore {
    path: PathBuf,
}

impl JsonAnswerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(ANSWERS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnswerStore for JsonAnswerStore {
    fn load(&self) -> Vec<AnswerRecord> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_answer_records_str(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read answers; starting empty");
                Vec::new()
            }
        }
    }

    fn save(&mut self, records: &[AnswerRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let body = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, body).map_err(|err| StoreError::io(&self.path, err))?;
        debug!(path = %self.path.display(), records = records.len(), "wrote answers");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }
}

/// Uploaded images stored as files under one directory. References are file paths.
#[derive(Debug, Clone)]
pub struct DirImageStore {
    dir: PathBuf,
}

impl DirImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(IMAGES_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageStore for DirImageStore {
    fn save(&mut self, bytes: &[u8], id: &str) -> Result<String, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::io(&self.dir, err))?;
        let path = self.dir.join(format!("{id}.{}", image_extension(bytes)));
        fs::write(&path, bytes).map_err(|err| StoreError::io(&path, err))?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn delete(&mut self, reference: &str) -> Result<(), StoreError> {
        let path = Path::new(reference);
        let escapes = path
            .components()
            .any(|component| component == Component::ParentDir);
        if escapes || !path.starts_with(&self.dir) {
            return Err(StoreError::UnknownImage(reference.to_string()));
        }
        fs::remove_file(path).map_err(|err| StoreError::io(path, err))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(&self.dir, err)),
        }
    }
}

/// File extension for the image format named by the leading magic bytes.
fn image_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        [b'B', b'M', ..] => "bmp",
        _ => "jpg",
    }
}
