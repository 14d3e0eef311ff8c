//! Configuration for the search backend connection.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the OpenSearch-compatible backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchBackendConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_use_ssl")]
    pub use_ssl: bool,
    #[serde(default = "default_verify_certs")]
    pub verify_certs: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_index")]
    pub default_index: String,
}

impl SearchBackendConfig {
    /// Load configuration from `NLQ__`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_env("NLQ")
    }

    /// Load configuration from environment with a custom prefix.
    pub fn load_from_env(prefix: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("host", "localhost")?
            .set_default("port", 9200)?
            .set_default("use_ssl", true)?
            .set_default("verify_certs", true)?
            .set_default("timeout_secs", 30)?
            .set_default("default_index", "logs-*")?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Base URL for the backend, e.g. `https://localhost:9200`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchBackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            username: None,
            password: None,
            use_ssl: default_use_ssl(),
            verify_certs: default_verify_certs(),
            timeout_secs: default_timeout_secs(),
            default_index: default_index(),
        }
    }
}

fn default_use_ssl() -> bool {
    true
}

fn default_verify_certs() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_index() -> String {
    "logs-*".to_string()
}
