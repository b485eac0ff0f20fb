use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub oncokb: OncoKbConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Annotation service settings
#[derive(Debug, Clone, Deserialize)]
pub struct OncoKbConfig {
    #[serde(default = "default_oncokb_base_url")]
    pub base_url: String,
    /// API token, sent as a bearer token when set
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Portal (profile listing) settings
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_oncokb_base_url() -> String {
    "https://www.oncokb.org".to_string()
}

fn default_portal_base_url() -> String {
    "https://www.cbioportal.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for OncoKbConfig {
    fn default() -> Self {
        Self {
            base_url: default_oncokb_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OncoKbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PortalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
