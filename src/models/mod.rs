pub mod config_record;

pub use config_record::{ConfigRecord, ConfigStatus, ConfigType, SmtpProfile};
