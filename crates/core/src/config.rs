use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::gate::Role;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub notifications: NotificationConfig,
    pub operator: OperatorConfig,
    pub logging: LoggingConfig,
}

/// Remote stored-procedure API reachable through the envelope client.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: SecretString,
    pub timeout_secs: u64,
}

/// Email-integration service consuming notification events.
#[derive(Clone, Debug)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub token: Option<SecretString>,
}

/// Default identity the CLI acts under when no flags are given.
#[derive(Clone, Debug)]
pub struct OperatorConfig {
    pub actor: String,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub operator_actor: Option<String>,
    pub operator_role: Option<Role>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:9200/api".to_string(),
                token: String::new().into(),
                timeout_secs: 30,
            },
            notifications: NotificationConfig { enabled: false, endpoint: None, token: None },
            operator: OperatorConfig { actor: "operator".to_string(), role: Role::Viewer },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    notifications: Option<NotificationPatch>,
    operator: Option<OperatorPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct NotificationPatch {
    enabled: Option<bool>,
    endpoint: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OperatorPatch {
    actor: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("leasedesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(token) = api.token {
                self.api.token = token.into();
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(notifications) = patch.notifications {
            if let Some(enabled) = notifications.enabled {
                self.notifications.enabled = enabled;
            }
            if let Some(endpoint) = notifications.endpoint {
                self.notifications.endpoint = Some(endpoint);
            }
            if let Some(token) = notifications.token {
                self.notifications.token = Some(token.into());
            }
        }

        if let Some(operator) = patch.operator {
            if let Some(actor) = operator.actor {
                self.operator.actor = actor;
            }
            if let Some(role) = operator.role {
                self.operator.role = role.parse().map_err(|_| {
                    ConfigError::Validation(format!("unsupported operator role `{role}`"))
                })?;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LEASEDESK_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = read_env("LEASEDESK_API_TOKEN") {
            self.api.token = value.into();
        }
        if let Some(value) = read_env("LEASEDESK_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("LEASEDESK_API_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LEASEDESK_NOTIFICATIONS_ENABLED") {
            self.notifications.enabled = parse_bool("LEASEDESK_NOTIFICATIONS_ENABLED", &value)?;
        }
        if let Some(value) = read_env("LEASEDESK_NOTIFICATIONS_ENDPOINT") {
            self.notifications.endpoint = Some(value);
        }
        if let Some(value) = read_env("LEASEDESK_NOTIFICATIONS_TOKEN") {
            self.notifications.token = Some(value.into());
        }

        if let Some(value) = read_env("LEASEDESK_OPERATOR_ACTOR") {
            self.operator.actor = value;
        }
        if let Some(value) = read_env("LEASEDESK_OPERATOR_ROLE") {
            self.operator.role = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "LEASEDESK_OPERATOR_ROLE".to_string(),
                value,
            })?;
        }

        if let Some(value) = read_env("LEASEDESK_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("LEASEDESK_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.api_base_url {
            self.api.base_url = base_url;
        }
        if let Some(token) = overrides.api_token {
            self.api.token = token.into();
        }
        if let Some(actor) = overrides.operator_actor {
            self.operator.actor = actor;
        }
        if let Some(role) = overrides.operator_role {
            self.operator.role = role;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "api.base_url must be an http(s) URL".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be positive".to_string()));
        }

        if self.notifications.enabled && self.notifications.endpoint.is_none() {
            return Err(ConfigError::Validation(
                "notifications.endpoint is required when notifications are enabled".to_string(),
            ));
        }

        if self.operator.actor.trim().is_empty() {
            return Err(ConfigError::Validation("operator.actor must not be blank".to_string()));
        }

        match self.logging.level.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "unsupported log level `{other}` (expected trace|debug|info|warn|error)"
            ))),
        }
    }

    /// Effective values with secrets redacted, for `leasedesk config`.
    pub fn redacted_summary(&self) -> Vec<(String, String)> {
        vec![
            ("api.base_url".to_string(), self.api.base_url.clone()),
            ("api.token".to_string(), redact(self.api.token.expose_secret())),
            ("api.timeout_secs".to_string(), self.api.timeout_secs.to_string()),
            ("notifications.enabled".to_string(), self.notifications.enabled.to_string()),
            (
                "notifications.endpoint".to_string(),
                self.notifications.endpoint.clone().unwrap_or_else(|| "(unset)".to_string()),
            ),
            (
                "notifications.token".to_string(),
                self.notifications
                    .token
                    .as_ref()
                    .map(|token| redact(token.expose_secret()))
                    .unwrap_or_else(|| "(unset)".to_string()),
            ),
            ("operator.actor".to_string(), self.operator.actor.clone()),
            ("operator.role".to_string(), self.operator.role.to_string()),
            ("logging.level".to_string(), self.logging.level.clone()),
            ("logging.format".to_string(), format!("{:?}", self.logging.format).to_lowercase()),
        ]
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        return "(unset)".to_string();
    }
    // Keep the last four characters, not bytes; tokens are not guaranteed
    // to be ASCII.
    let start = secret.char_indices().rev().nth(3).map(|(index, _)| index).unwrap_or(0);
    format!("***{}", &secret[start..])
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("leasedesk.toml"), PathBuf::from("config/leasedesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
