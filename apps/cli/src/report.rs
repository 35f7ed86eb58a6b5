//! Run summary shown to the operator.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flashcard_core::DroppedWord;
use serde::Serialize;

use crate::error::{AppError, Result};

/// What a run produced and what it had to leave out.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input_file: PathBuf,
    pub output_csv_file: PathBuf,
    pub rows_written: usize,
    /// Media already in the output directory and not fetched again.
    pub images_already_present: Vec<String>,
    pub audio_already_present: Vec<String>,
    /// Words excluded because their media could not be obtained.
    pub dropped: Vec<DroppedWord>,
}

impl RunSummary {
    pub fn new(input_file: &Path, output_csv_file: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            input_file: input_file.to_path_buf(),
            output_csv_file: output_csv_file.to_path_buf(),
            rows_written: 0,
            images_already_present: Vec::new(),
            audio_already_present: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn log(&self) {
        for word in &self.dropped {
            tracing::warn!(
                "Excluded {} / {}: {}",
                word.english,
                word.translation,
                word.reason.as_str()
            );
        }
        if !self.dropped.is_empty() {
            tracing::warn!(
                "{} words were excluded; {} cards written",
                self.dropped.len(),
                self.rows_written
            );
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| AppError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("Wrote run report to {}", path.display());
        Ok(())
    }
}
