use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a scheduled email job as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
    #[default]
    Started,
    Stopped,
    Error,
}

impl ConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigStatus::Started => "started",
            ConfigStatus::Stopped => "stopped",
            ConfigStatus::Error => "error",
        }
    }
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "started" => Ok(ConfigStatus::Started),
            "stopped" => Ok(ConfigStatus::Stopped),
            "error" => Ok(ConfigStatus::Error),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Report family. The wire literals are the server's, spelling included.
/// Types the console does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConfigType {
    #[default]
    #[serde(rename = "Routien")]
    Routine,
    #[serde(rename = "Bacteria")]
    Bacteria,
    #[serde(untagged)]
    Other(String),
}

impl ConfigType {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigType::Routine => "Routien",
            ConfigType::Bacteria => "Bacteria",
            ConfigType::Other(name) => name,
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("config type cannot be empty".to_string()),
            "Routien" => Ok(ConfigType::Routine),
            "Bacteria" => Ok(ConfigType::Bacteria),
            other => Ok(ConfigType::Other(other.to_string())),
        }
    }
}

/// SMTP profiles known to the console. Records only carry the numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmtpProfile {
    Gmail,
    ZeptoMail,
}

impl SmtpProfile {
    pub const ALL: [SmtpProfile; 2] = [SmtpProfile::Gmail, SmtpProfile::ZeptoMail];

    pub fn id(&self) -> i64 {
        match self {
            SmtpProfile::Gmail => 103,
            SmtpProfile::ZeptoMail => 102,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SmtpProfile::Gmail => "Gmail",
            SmtpProfile::ZeptoMail => "ZeptoMail",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_smtp_id() -> i64 {
    SmtpProfile::Gmail.id()
}

/// A scheduled report/email job. The server owns the authoritative copy;
/// the console only ever holds a transient one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub config_name: String,
    #[serde(rename = "type", default)]
    pub config_type: ConfigType,
    #[serde(default)]
    pub status: ConfigStatus,
    pub send_to: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cc: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
    #[serde(default = "default_smtp_id")]
    pub setting_smtp_id: i64,
    #[serde(default)]
    pub schedule_time_hour: i32,
    #[serde(default)]
    pub schedule_time_minute: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            id: None,
            config_name: String::new(),
            config_type: ConfigType::Routine,
            status: ConfigStatus::Started,
            send_to: String::new(),
            cc: String::new(),
            path: String::new(),
            backup: None,
            setting_smtp_id: default_smtp_id(),
            schedule_time_hour: 0,
            schedule_time_minute: 1,
            description: None,
        }
    }
}

impl ConfigRecord {
    /// A record without a server-assigned id goes down the create path.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn smtp_profile(&self) -> Option<SmtpProfile> {
        SmtpProfile::from_id(self.setting_smtp_id)
    }

    /// `HH:MM`, no range checks.
    pub fn schedule_label(&self) -> String {
        format!("{:02}:{:02}", self.schedule_time_hour, self.schedule_time_minute)
    }
}
