use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::records::DetectionRecord;
use crate::storage::domain::detection_store::DetectionStore;

#[derive(Error, Debug)]
pub enum JsonlStoreError {
    #[error("failed to open detection log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to detection log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize detection record: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Append-only detection log: one JSON object per line.
///
/// Workers append whole lines in append mode, which is the granularity
/// readers consume.
pub struct JsonlDetectionStore {
    path: PathBuf,
}

impl JsonlDetectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetectionStore for JsonlDetectionStore {
    fn append_batch(&self, records: &[DetectionRecord]) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| JsonlStoreError::Open {
                path: self.path.clone(),
                source: e,
            })?;

        for record in records {
            let line = serde_json::to_string(record).map_err(JsonlStoreError::Serialize)?;
            writeln!(file, "{line}").map_err(|e| JsonlStoreError::Append {
                path: self.path.clone(),
                source: e,
            })?;
        }

        file.flush().map_err(|e| JsonlStoreError::Append {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}
