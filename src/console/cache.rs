use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::{ApiError, ConfigEmailApi};
use crate::models::ConfigRecord;

#[derive(Debug, Default)]
struct CacheState {
    records: Option<Arc<Vec<ConfigRecord>>>,
    stale: bool,
    generation: u64,
}

/// Client-side copy of the record list.
///
/// Writes never patch this list: they call [`RecordCache::invalidate`] and the
/// next [`RecordCache::get`] reloads everything from the server. The lock is
/// held across the fetch so concurrent readers share a single request.
#[derive(Debug, Default)]
pub struct RecordCache {
    state: Mutex<CacheState>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(
        &self,
        api: &dyn ConfigEmailApi,
    ) -> Result<Arc<Vec<ConfigRecord>>, ApiError> {
        let mut state = self.state.lock().await;
        if let Some(records) = &state.records {
            if !state.stale {
                return Ok(Arc::clone(records));
            }
        }

        debug!(generation = state.generation, "Record list missing or stale, fetching.");
        // A failed fetch keeps the cache stale so the next read retries.
        state.stale = true;
        let records = Arc::new(api.list().await?);
        info!(count = records.len(), "Loaded config email records.");
        state.records = Some(Arc::clone(&records));
        state.stale = false;
        Ok(records)
    }

    /// Forces a refetch on the next read.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.stale = true;
        state.generation += 1;
        debug!(generation = state.generation, "Record list invalidated.");
    }

    pub async fn is_stale(&self) -> bool {
        let state = self.state.lock().await;
        state.stale || state.records.is_none()
    }

    /// Number of invalidations so far.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }
}
