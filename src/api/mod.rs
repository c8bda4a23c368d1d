use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ConfigRecord, ConfigStatus};

pub mod http;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpConfigEmailApi;

/// Shown when neither the server nor the transport produced anything readable.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid API url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The text a user sees: the server's `message` when it sent one, then the
    /// transport-level description, then a generic fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidUrl(_) => None,
        }
    }
}

/// Optional JSON error body returned by the backend.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl ErrorBody {
    /// Non-JSON bodies simply carry no message.
    pub(crate) fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

/// The remote config-email endpoints.
///
/// Every console component talks to the backend through this trait so the
/// reqwest client can be swapped for a recording double in tests.
#[async_trait]
pub trait ConfigEmailApi: Send + Sync {
    /// `GET /config-email/list`
    async fn list(&self) -> Result<Vec<ConfigRecord>, ApiError>;

    /// `POST /config-email/save`; the body carries no identifier.
    async fn create(&self, record: &ConfigRecord) -> Result<(), ApiError>;

    /// `PUT /config-email/update/{id}`
    async fn update(&self, id: i64, record: &ConfigRecord) -> Result<(), ApiError>;

    /// `DELETE /config-email/delete/{id}`
    async fn delete(&self, id: i64) -> Result<(), ApiError>;

    /// `PUT /config-email/update/status/{id}?status=<value>`
    async fn update_status(&self, id: i64, status: ConfigStatus) -> Result<(), ApiError>;

    /// `GET /report/download`, raw spreadsheet bytes.
    async fn download_report(&self) -> Result<Bytes, ApiError>;
}
