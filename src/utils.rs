use anyhow::Context;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "weather_reports";

pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine system data directory"))
        .map(|p| p.join(DATA_DIR_NAME))
}

pub async fn ensure_data_dir_exists(path: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(anyhow::anyhow!(
                    "Data path exists but is not a directory: {}",
                    path.display()
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating data directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
