//! Recording double for [`ConfigEmailApi`], used by the console tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use super::{ApiError, ConfigEmailApi};
use crate::models::{ConfigRecord, ConfigStatus};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Create(ConfigRecord),
    Update(i64, ConfigRecord),
    Delete(i64),
    UpdateStatus(i64, ConfigStatus),
    DownloadReport,
}

#[derive(Default)]
pub(crate) struct MockApi {
    pub(crate) records: Mutex<Vec<ConfigRecord>>,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) write_failure: Mutex<Option<(u16, Option<String>)>>,
    pub(crate) failing_ids: Mutex<HashSet<i64>>,
    pub(crate) list_failure: Mutex<Option<u16>>,
    pub(crate) report: Mutex<Option<Bytes>>,
    /// When set, every per-id request waits here before answering.
    pub(crate) rendezvous: Mutex<Option<Arc<Barrier>>>,
}

impl MockApi {
    pub(crate) fn with_records(records: Vec<ConfigRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fail_writes_with(&self, status: u16, message: Option<&str>) {
        *self.write_failure.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    pub(crate) fn fail_id(&self, id: i64) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_result(&self) -> Result<(), ApiError> {
        match self.write_failure.lock().unwrap().clone() {
            Some((status, message)) => Err(ApiError::Status { status, message }),
            None => Ok(()),
        }
    }

    async fn per_id_result(&self, id: i64) -> Result<(), ApiError> {
        let barrier = self.rendezvous.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        if self.failing_ids.lock().unwrap().contains(&id) {
            return Err(ApiError::Status {
                status: 500,
                message: Some(format!("record {id} failed")),
            });
        }
        Ok(())
    }
}

pub(crate) fn sample_record(id: i64, name: &str) -> ConfigRecord {
    ConfigRecord {
        id: Some(id),
        config_name: name.to_string(),
        send_to: format!("{}@x.com", name.to_lowercase()),
        path: format!("/data/{}", name.to_lowercase()),
        ..ConfigRecord::default()
    }
}

#[async_trait]
impl ConfigEmailApi for MockApi {
    async fn list(&self) -> Result<Vec<ConfigRecord>, ApiError> {
        self.record(Call::List);
        if let Some(status) = *self.list_failure.lock().unwrap() {
            return Err(ApiError::Status {
                status,
                message: None,
            });
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, record: &ConfigRecord) -> Result<(), ApiError> {
        self.record(Call::Create(record.clone()));
        self.write_result()
    }

    async fn update(&self, id: i64, record: &ConfigRecord) -> Result<(), ApiError> {
        self.record(Call::Update(id, record.clone()));
        self.write_result()
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.record(Call::Delete(id));
        self.per_id_result(id).await
    }

    async fn update_status(&self, id: i64, status: ConfigStatus) -> Result<(), ApiError> {
        self.record(Call::UpdateStatus(id, status));
        self.per_id_result(id).await
    }

    async fn download_report(&self) -> Result<Bytes, ApiError> {
        self.record(Call::DownloadReport);
        self.report.lock().unwrap().clone().ok_or(ApiError::Status {
            status: 503,
            message: None,
        })
    }
}
