// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::render::OutputFormat;
use crate::utils::error::StorageError;

/// Per-field summary recorded in the metadata file.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub present: bool,
    pub segment_count: usize,
    pub title_count: usize,
    pub skipped_lines: usize,
}

/// What was parsed and from where.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub source: String,
    pub company_name: Option<String>,
    pub report_title: Option<String>,
    pub report_date: Option<String>,
    pub categories: Vec<String>,
    pub format: String,
    pub fields: Vec<FieldSummary>,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory for one run, e.g. `/base_dir/report-42/`.
    pub fn target_dir(&self, key: &str) -> PathBuf {
        self.base_dir.join(sanitize_key(key))
    }

    fn ensure_target_dir(&self, key: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.target_dir(key);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)
                .map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves one rendered field as `{key}/{field}.{ext}`.
    pub fn save_rendered(&self, key: &str, field: &str, format: OutputFormat, body: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_target_dir(key)?;
        let file_path = target_dir.join(format!("{}.{}", sanitize_key(field), format.extension()));

        fs::write(&file_path, body)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} to {}", field, file_path.display());

        Ok(file_path)
    }

    /// Saves run metadata as `{key}/metadata.json`, stamped with the current UTC time.
    pub fn save_metadata(&self, key: &str, metadata: &RunMetadata) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_target_dir(key)?;
        let file_path = target_dir.join("metadata.json");

        let mut value = serde_json::to_value(metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "extraction_timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }

        let metadata_str = serde_json::to_string_pretty(&value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

/// Keeps keys to a single path component.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}
