use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `CONFIG_EMAIL_BASE_URL`.
pub const ENV_PREFIX: &str = "CONFIG_EMAIL_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// The TOML file that contributed to this config, if one was read.
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
pub(crate) struct PartialConsoleConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    report_dir: Option<String>,
    log_dir: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_report_dir() -> String {
    ".".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl ConsoleConfig {
    /// Layers `.env`, the optional TOML file and `CONFIG_EMAIL_*` variables;
    /// the environment wins over the file, `base_url_override` wins over both.
    pub fn load(
        config_path: Option<&Path>,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let env_config: PartialConsoleConfig = envy::prefixed(ENV_PREFIX).from_env()?;
        Self::from_layers(config_path, env_config, base_url_override)
    }

    pub(crate) fn from_layers(
        config_path: Option<&Path>,
        env_config: PartialConsoleConfig,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        // 1. Load from file (optional)
        let (file_config, config_file) = match config_path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let parsed: PartialConsoleConfig =
                    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                (parsed, Some(path.to_path_buf()))
            }
            _ => (PartialConsoleConfig::default(), None),
        };

        // 2. Merge: override > environment > file > defaults
        let base_url = base_url_override
            .map(str::to_string)
            .or(env_config.base_url)
            .or(file_config.base_url)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("CONFIG_EMAIL_BASE_URL"))?;

        Ok(ConsoleConfig {
            base_url,
            request_timeout_secs: env_config
                .request_timeout_secs
                .or(file_config.request_timeout_secs)
                .unwrap_or_else(default_request_timeout_secs),
            report_dir: env_config
                .report_dir
                .or(file_config.report_dir)
                .unwrap_or_else(default_report_dir),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            config_file,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_layer(vars: &[(&str, &str)]) -> PartialConsoleConfig {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .unwrap()
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_values_with_defaults() {
        let file = config_file("base_url = \"https://reports.example.com/api\"\n");
        let config =
            ConsoleConfig::from_layers(Some(file.path()), env_layer(&[]), None).unwrap();
        assert_eq!(config.base_url, "https://reports.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.report_dir, ".");
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.config_file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = config_file(
            "base_url = \"https://file.example.com/api\"\nrequest_timeout_secs = 5\n",
        );
        let env = env_layer(&[
            ("CONFIG_EMAIL_BASE_URL", "https://env.example.com/api"),
            ("CONFIG_EMAIL_REPORT_DIR", "/tmp/reports"),
        ]);
        let config = ConsoleConfig::from_layers(Some(file.path()), env, None).unwrap();
        assert_eq!(config.base_url, "https://env.example.com/api");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.report_dir, "/tmp/reports");
    }

    #[test]
    fn test_cli_override_wins() {
        let env = env_layer(&[("CONFIG_EMAIL_BASE_URL", "https://env.example.com/api")]);
        let config =
            ConsoleConfig::from_layers(None, env, Some("http://localhost:8080/api")).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_missing_base_url() {
        let err = ConsoleConfig::from_layers(None, env_layer(&[]), None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let config = ConsoleConfig::from_layers(
            Some(Path::new("/nonexistent/console.toml")),
            env_layer(&[]),
            Some("http://localhost/api"),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost/api");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let file = config_file("base_url = ");
        let err = ConsoleConfig::from_layers(Some(file.path()), env_layer(&[]), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
