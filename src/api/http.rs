use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiError, ConfigEmailApi, ErrorBody};
use crate::models::{ConfigRecord, ConfigStatus};

const USER_AGENT: &str = concat!("config-email-console/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed client for the config-email backend.
#[derive(Debug, Clone)]
pub struct HttpConfigEmailApi {
    client: Client,
    base_url: Url,
}

impl HttpConfigEmailApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidUrl("base url is empty".to_string()));
        }
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::InvalidUrl(format!("{trimmed}: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Turns any non-2xx response into `ApiError::Status`, keeping the
    /// server's `message` if the body has one.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = ErrorBody::parse(&body).message;
        warn!(status = status.as_u16(), message = ?message, "Backend returned an error response.");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ConfigEmailApi for HttpConfigEmailApi {
    async fn list(&self) -> Result<Vec<ConfigRecord>, ApiError> {
        let url = self.endpoint("config-email/list")?;
        debug!(url = %url, "Fetching config email list.");
        let response = Self::check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, record: &ConfigRecord) -> Result<(), ApiError> {
        let url = self.endpoint("config-email/save")?;
        debug!(url = %url, config_name = %record.config_name, "Creating config email.");
        // The create body never carries an identifier.
        let body = ConfigRecord {
            id: None,
            ..record.clone()
        };
        Self::check(self.client.post(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn update(&self, id: i64, record: &ConfigRecord) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("config-email/update/{id}"))?;
        debug!(url = %url, id, "Updating config email.");
        let body = ConfigRecord {
            id: Some(id),
            ..record.clone()
        };
        Self::check(self.client.put(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("config-email/delete/{id}"))?;
        debug!(url = %url, id, "Deleting config email.");
        Self::check(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn update_status(&self, id: i64, status: ConfigStatus) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("config-email/update/status/{id}"))?;
        debug!(url = %url, id, status = %status, "Updating config email status.");
        let request = self
            .client
            .put(url)
            .query(&[("status", status.as_str())]);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn download_report(&self) -> Result<Bytes, ApiError> {
        let url = self.endpoint("report/download")?;
        debug!(url = %url, "Downloading report.");
        let response = Self::check(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?)
    }
}
