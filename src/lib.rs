pub mod api;
pub mod cc_list;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod models;
pub mod version;

pub use api::{ApiError, ConfigEmailApi, HttpConfigEmailApi};
pub use cc_list::{CcListEditor, CcListError};
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::ConsoleError;
pub use models::{ConfigRecord, ConfigStatus, ConfigType, SmtpProfile};
