//! File-backed report store: one JSON array in the data directory.

use crate::report::model::Report;
use crate::store::error::StoreError;
use crate::store::ReportStore;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

const STORE_FILE_NAME: &str = "reports.json";

/// Stores the report list as `reports.json` under the given data directory.
///
/// Reads of an absent file yield an empty list; writes replace the file
/// atomically via a temp file so a crash mid-write never leaves a truncated
/// store behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<Report>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::ReadFile(self.path.clone(), e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(self.path.clone(), e))
    }

    async fn write_all(&self, reports: &[Report]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(reports).map_err(StoreError::Encode)?;
        let path = self.path.clone();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::WriteFile(path.clone(), e))?;
        }

        let count = reports.len();
        task::spawn_blocking(move || {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file =
                NamedTempFile::new_in(dir).map_err(|e| StoreError::WriteFile(path.clone(), e))?;
            temp_file
                .write_all(&json)
                .map_err(|e| StoreError::WriteFile(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| StoreError::WriteFile(path.clone(), e.error))?;
            info!("Wrote {} report(s) to {}", count, path.display());
            Ok::<(), StoreError>(())
        })
        .await??;
        Ok(())
    }
}
