use std::sync::Arc;
use tracing::{info, warn};

use super::cache::RecordCache;
use super::form::RecordForm;
use crate::api::{ApiError, ConfigEmailApi};
use crate::error::ConsoleError;
use crate::models::ConfigRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated(i64),
}

/// Sends a form's record to the server and reconciles the form with the result.
pub struct MutationReconciler {
    api: Arc<dyn ConfigEmailApi>,
    cache: Arc<RecordCache>,
}

impl MutationReconciler {
    pub fn new(api: Arc<dyn ConfigEmailApi>, cache: Arc<RecordCache>) -> Self {
        Self { api, cache }
    }

    /// Create when `id` is `None`, update otherwise. Invalidates the list on
    /// success; nothing is merged locally.
    pub async fn save(&self, record: &ConfigRecord, id: Option<i64>) -> Result<SubmitOutcome, ApiError> {
        let outcome = match id {
            Some(id) => {
                self.api.update(id, record).await?;
                SubmitOutcome::Updated(id)
            }
            None => {
                self.api.create(record).await?;
                SubmitOutcome::Created
            }
        };
        self.cache.invalidate().await;
        Ok(outcome)
    }

    /// On success the form is closed with its error cleared. On failure the
    /// form stays open, keeps every input including the CC list, and shows
    /// the server's message.
    pub async fn submit(&self, form: &mut RecordForm) -> Result<SubmitOutcome, ConsoleError> {
        form.validate()?;
        let payload = form.payload();

        match self.save(&payload, form.existing_id()).await {
            Ok(outcome) => {
                info!(config_name = %payload.config_name, outcome = ?outcome, "Config email saved.");
                form.dismiss_api_error();
                form.close();
                Ok(outcome)
            }
            Err(e) => {
                let message = e.user_message();
                warn!(config_name = %payload.config_name, error = %message, "Config email save failed.");
                form.set_api_error(message);
                Err(ConsoleError::Request(e))
            }
        }
    }
}
