use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::answers::AnswerRecord;

/// Largest image accepted for upload.
pub const MAX_UPLOAD_BYTES: usize = 130 * 1024;

/// Errors raised by answer and image stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode answers: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store is read-only")]
    ReadOnly,
    #[error("unknown image '{0}'")]
    UnknownImage(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Key-value persistence for answers.
pub trait AnswerStore {
    /// Returns the stored answers; a missing or corrupt store yields an empty list.
    fn load(&self) -> Vec<AnswerRecord>;
    /// Replaces the stored answers with `records`.
    fn save(&mut self, records: &[AnswerRecord]) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Storage for uploaded images, addressed by the reference `save` returns.
pub trait ImageStore {
    fn save(&mut self, bytes: &[u8], id: &str) -> Result<String, StoreError>;
    fn delete(&mut self, reference: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Read access to stored images during export.
pub trait ImageSource {
    fn read(&self, reference: &str) -> io::Result<Vec<u8>>;
}

/// Reads image references as filesystem paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn read(&self, reference: &str) -> io::Result<Vec<u8>> {
        std::fs::read(reference)
    }
}

/// Answer store kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnswerStore {
    records: Vec<AnswerRecord>,
    read_only: bool,
    saves: usize,
}

impl MemoryAnswerStore {
    pub fn new(records: Vec<AnswerRecord>) -> Self {
        Self {
            records,
            read_only: false,
            saves: 0,
        }
    }

    /// A store that loads `records` but rejects every write.
    pub fn read_only(records: Vec<AnswerRecord>) -> Self {
        Self {
            records,
            read_only: true,
            saves: 0,
        }
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn load(&self) -> Vec<AnswerRecord> {
        self.records.clone()
    }

    fn save(&mut self, records: &[AnswerRecord]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.records.clear();
        Ok(())
    }
}

/// Image store kept in memory; references are `memory://{id}.jpg`.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: BTreeMap<String, Vec<u8>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(reference.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.images.contains_key(reference)
    }
}

impl ImageStore for MemoryImageStore {
    fn save(&mut self, bytes: &[u8], id: &str) -> Result<String, StoreError> {
        let reference = format!("memory://{id}.jpg");
        self.images.insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    fn delete(&mut self, reference: &str) -> Result<(), StoreError> {
        self.images
            .remove(reference)
            .map(|_| ())
            .ok_or_else(|| StoreError::UnknownImage(reference.to_string()))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.images.clear();
        Ok(())
    }
}

impl ImageSource for MemoryImageStore {
    fn read(&self, reference: &str) -> io::Result<Vec<u8>> {
        self.images.get(reference).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no image '{reference}'"))
        })
    }
}
