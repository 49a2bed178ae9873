use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use audit_spec::{HiddenIds, MAX_GALLERY_IMAGES, MAX_UPLOAD_BYTES, QuestionSchema, WidgetPosition};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Questionnaire shipped with the binary.
pub const DEFAULT_SCHEMA: &str = include_str!("../assets/questions.json");

pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "AUDIT_FORM_DATA_DIR";

/// Settings read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding `answers.json` and `user_images/`.
    pub data_dir: Option<PathBuf>,
    /// Questionnaire file replacing the built-in one.
    pub schema_path: Option<PathBuf>,
    /// Retired question ids; replaces the built-in list when set.
    pub hidden_ids: Option<Vec<String>>,
    pub max_upload_kb: Option<usize>,
    pub max_gallery_images: Option<usize>,
    /// Where exports are written when no `--output` is given.
    pub output_dir: Option<PathBuf>,
    /// Argv of an HTML to PDF converter with `{input}` and `{output}` placeholders.
    pub pdf_command: Option<Vec<String>>,
    pub widget_position: Option<WidgetPosition>,
}

impl AppConfig {
    /// Reads `explicit`, or the per-user config file when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolves the data directory: command line, then config, then the platform default.
    pub fn data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| anyhow!("no home directory; pass --data-dir or set {DATA_DIR_ENV}"))
    }

    pub fn schema(&self, cli_override: Option<&Path>) -> Result<QuestionSchema> {
        match cli_override.or(self.schema_path.as_deref()) {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read questionnaire {}", path.display()))?;
                QuestionSchema::from_json(&raw)
                    .with_context(|| format!("invalid questionnaire {}", path.display()))
            }
            None => QuestionSchema::from_json(DEFAULT_SCHEMA).context("built-in questionnaire"),
        }
    }

    pub fn hidden_ids(&self) -> HiddenIds {
        match &self.hidden_ids {
            Some(ids) => HiddenIds::new(ids.iter().cloned()),
            None => HiddenIds::defaults(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_kb
            .map(|kb| kb * 1024)
            .unwrap_or(MAX_UPLOAD_BYTES)
    }

    pub fn gallery_cap(&self) -> usize {
        self.max_gallery_images.unwrap_or(MAX_GALLERY_IMAGES)
    }

    /// Export directory: config, then the desktop, then the working directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| {
                UserDirs::new().and_then(|dirs| dirs.desktop_dir().map(Path::to_path_buf))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn widget_position(&self) -> WidgetPosition {
        self.widget_position.unwrap_or_default()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "accessibility-audit", "audit-form")
}
