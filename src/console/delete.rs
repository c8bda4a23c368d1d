use std::sync::Arc;
use tracing::info;

use super::bulk::fan_out;
use super::cache::RecordCache;
use super::selection::SelectionSet;
use crate::api::ConfigEmailApi;
use crate::error::ConsoleError;
use crate::models::ConfigRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Single { id: i64, name: String },
    Selected(Vec<i64>),
}

/// The confirmation step in front of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    target: DeleteTarget,
}

impl DeletePrompt {
    /// `None` when the record has never been saved.
    pub fn for_record(record: &ConfigRecord) -> Option<Self> {
        record.id.map(|id| Self {
            target: DeleteTarget::Single {
                id,
                name: record.config_name.clone(),
            },
        })
    }

    /// `None` for an empty selection. A one-item selection reads like a
    /// single delete but without a name.
    pub fn for_selection(selection: &SelectionSet) -> Option<Self> {
        if selection.is_empty() {
            return None;
        }
        Some(Self {
            target: DeleteTarget::Selected(selection.ids()),
        })
    }

    pub fn target(&self) -> &DeleteTarget {
        &self.target
    }

    pub fn ids(&self) -> Vec<i64> {
        match &self.target {
            DeleteTarget::Single { id, .. } => vec![*id],
            DeleteTarget::Selected(ids) => ids.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        "Confirm Deletion"
    }

    pub fn message(&self) -> String {
        let subject = match &self.target {
            DeleteTarget::Single { name, .. } => name.clone(),
            DeleteTarget::Selected(ids) if ids.len() > 1 => {
                format!("{} selected items", ids.len())
            }
            DeleteTarget::Selected(_) => "the selected item".to_string(),
        };
        format!("Are you sure you want to delete {subject}? This action cannot be undone.")
    }
}

pub struct DeleteFlow {
    api: Arc<dyn ConfigEmailApi>,
    cache: Arc<RecordCache>,
}

impl DeleteFlow {
    pub fn new(api: Arc<dyn ConfigEmailApi>, cache: Arc<RecordCache>) -> Self {
        Self { api, cache }
    }

    /// Runs a confirmed prompt. On success the list is invalidated and the
    /// deleted ids leave the selection. Nothing changes locally on failure so
    /// the user can confirm again.
    pub async fn confirm(
        &self,
        prompt: &DeletePrompt,
        selection: &mut SelectionSet,
    ) -> Result<usize, ConsoleError> {
        let deleted = match prompt.target() {
            DeleteTarget::Single { id, name } => {
                self.api.delete(*id).await?;
                info!(id, config_name = %name, "Config email deleted.");
                selection.deselect(*id);
                1
            }
            DeleteTarget::Selected(ids) => {
                let api = &self.api;
                fan_out(ids, "delete", move |id| api.delete(id)).await?;
                info!(count = ids.len(), "Selected config emails deleted.");
                selection.clear();
                ids.len()
            }
        };
        self.cache.invalidate().await;
        Ok(deleted)
    }
}
