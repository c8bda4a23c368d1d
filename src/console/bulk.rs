use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::cache::RecordCache;
use super::selection::SelectionSet;
use crate::api::{ApiError, ConfigEmailApi};
use crate::models::ConfigStatus;

/// A fan-out where at least one request failed. Which ones failed is
/// not reported; the server may be left partially updated.
#[derive(Error, Debug)]
#[error("Failed to {action} {total} selected record(s): {first_failure}")]
pub struct BulkError {
    pub action: String,
    pub total: usize,
    pub first_failure: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    NothingSelected,
    Applied(usize),
}

/// Sends one request per identifier, all at once, and waits for every one of
/// them. Only the overall result matters.
pub(crate) async fn fan_out<F, Fut>(ids: &[i64], action: &str, request: F) -> Result<(), BulkError>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let results = join_all(ids.iter().map(|&id| {
        let fut = request(id);
        async move { (id, fut.await) }
    }))
    .await;

    let mut first_failure = None;
    for (id, result) in results {
        if let Err(e) = result {
            warn!(id, action, error = %e, "Bulk request failed.");
            first_failure.get_or_insert_with(|| e.user_message());
        }
    }

    match first_failure {
        Some(first_failure) => Err(BulkError {
            action: action.to_string(),
            total: ids.len(),
            first_failure,
        }),
        None => Ok(()),
    }
}

pub struct BulkStatusCoordinator {
    api: Arc<dyn ConfigEmailApi>,
    cache: Arc<RecordCache>,
}

impl BulkStatusCoordinator {
    pub fn new(api: Arc<dyn ConfigEmailApi>, cache: Arc<RecordCache>) -> Self {
        Self { api, cache }
    }

    /// Applies `status` to every selected id. On success the list is
    /// invalidated and the selection cleared; on any failure both are left
    /// untouched. An empty selection sends nothing.
    pub async fn apply(
        &self,
        selection: &mut SelectionSet,
        status: ConfigStatus,
    ) -> Result<BulkOutcome, BulkError> {
        if selection.is_empty() {
            return Ok(BulkOutcome::NothingSelected);
        }
        let ids = selection.ids();
        let action = format!("set status {status} on");
        let api = &self.api;

        fan_out(&ids, &action, move |id| api.update_status(id, status)).await?;

        info!(count = ids.len(), status = %status, "Bulk status update applied.");
        self.cache.invalidate().await;
        selection.clear();
        Ok(BulkOutcome::Applied(ids.len()))
    }
}
