pub mod answer;
pub mod clear;
pub mod export;
pub mod images;
pub mod schema;
pub mod show;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Result, bail};
use audit_spec::{AuditSession, SaveStatus};
use tracing::debug;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::store::{DirImageStore, JsonAnswerStore};

/// Everything a command needs: config, the open session and the image store.
pub struct Context {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub session: AuditSession<JsonAnswerStore>,
    pub images: DirImageStore,
}

impl Context {
    pub fn open(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(cli.config.as_deref())?;
        let data_dir = config.data_dir(cli.data_dir.as_deref())?;
        let schema = config.schema(cli.schema.as_deref())?;
        debug!(data_dir = %data_dir.display(), questions = schema.len(), "opening session");

        let session = AuditSession::open(
            schema,
            JsonAnswerStore::in_dir(&data_dir),
            config.hidden_ids(),
        );
        Ok(Self {
            images: DirImageStore::in_dir(&data_dir),
            config,
            data_dir,
            session,
        })
    }
}

/// Turns a failed write into a command failure.
pub(crate) fn ensure_saved(status: SaveStatus) -> Result<()> {
    match status {
        SaveStatus::Saved => Ok(()),
        SaveStatus::Failed { reason } => bail!("answer was not saved: {reason}"),
    }
}
