//! Configuration for the gateway client and the probe binary.

use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Immutable settings of a [`GatewayClient`](crate::GatewayClient).
///
/// The library never reads the environment; embedding applications build this
/// value themselves (or via [`ProbeConfig`]).
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    project_id: Option<String>,
    timeout_secs: f64,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            project_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Default project sent when a call does not name one. Empty means none.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        self.project_id = (!project_id.is_empty()).then_some(project_id);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    /// Timeout as a [`Duration`]; rejects NaN, infinite, zero and negative values.
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs.is_nan() || self.timeout_secs <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "timeout must be positive, got {}",
                self.timeout_secs
            )));
        }
        Duration::try_from_secs_f64(self.timeout_secs)
            .map_err(|e| Error::InvalidConfig(format!("invalid timeout: {}", e)))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Configuration of the `caas-probe` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gateway connection settings as they appear in `caas.toml`.
#[derive(Clone, Deserialize)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

impl GatewaySettings {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.base_url, self.api_key.clone())
            .with_timeout_secs(self.timeout_secs);
        match &self.project_id {
            Some(project_id) => config.with_project_id(project_id.clone()),
            None => config,
        }
    }
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl ProbeConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (CAAS__SECTION__KEY format)
    /// 2. The file at `path`, or `caas.toml` in the working directory if present
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("caas").required(false),
        };

        let config = ConfigLoader::builder()
            .set_default("gateway.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("CAAS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
