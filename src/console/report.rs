use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::api::{ApiError, ConfigEmailApi};

pub const REPORT_FILE_NAME: &str = "hospital_report.xlsx";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to download report: {}", .0.user_message())]
    Request(#[from] ApiError),
    #[error("Failed to save report to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct ReportExporter {
    api: Arc<dyn ConfigEmailApi>,
}

impl ReportExporter {
    pub fn new(api: Arc<dyn ConfigEmailApi>) -> Self {
        Self { api }
    }

    /// Downloads the spreadsheet into `dir/hospital_report.xlsx`, replacing any
    /// previous export. Returns the written path.
    pub async fn export_to(&self, dir: &Path) -> Result<PathBuf, DownloadError> {
        let bytes = self.api.download_report().await?;
        let path = dir.join(REPORT_FILE_NAME);
        let write_err = |source| DownloadError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(dir).await.map_err(write_err)?;
        let mut file = File::create(&path).await.map_err(write_err)?;
        file.write_all(&bytes).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        info!(path = ?path, size = bytes.len(), "Report downloaded.");
        Ok(path)
    }
}
