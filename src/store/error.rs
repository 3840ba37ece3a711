use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read report store '{0}'")]
    ReadFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to write report store '{0}'")]
    WriteFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode report store '{0}'")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode reports")]
    Encode(#[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
