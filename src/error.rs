use thiserror::Error;

use crate::api::ApiError;
use crate::cc_list::CcListError;
use crate::config::ConfigError;
use crate::console::bulk::BulkError;
use crate::console::form::FormError;
use crate::console::report::DownloadError;

#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Rejected CC entry; nothing else changed.
    #[error("{0}")]
    Validation(#[from] CcListError),
    #[error("{0}")]
    Form(#[from] FormError),
    /// Single create/update/delete/list request failed.
    #[error("Request failed: {}", .0.user_message())]
    Request(#[from] ApiError),
    #[error("{0}")]
    BulkRequest(#[from] BulkError),
    #[error("{0}")]
    Download(#[from] DownloadError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Record not found: {0}")]
    RecordNotFound(i64),
    #[error("No form is open")]
    NoOpenForm,
    #[error("No deletion is pending confirmation")]
    NoPendingDelete,
}

impl ConsoleError {
    /// Every console failure is recoverable by retrying or cancelling; this only
    /// tells callers whether the user's input was at fault.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Form(_))
    }
}
