//! Service configuration, loaded from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

/// A configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub mistral_api_key: String,
    /// Model override for every generation step; client default when unset.
    pub chat_model: Option<String>,
    /// Upper bound on one completion round trip.
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8090".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let mistral_api_key = std::env::var("MISTRAL_API_KEY")
            .map_err(|_| ConfigError::MissingVar("MISTRAL_API_KEY".to_string()))?;

        let chat_model = std::env::var("CHAT_MODEL").ok();

        let request_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?),
            Err(_) => Duration::from_secs(120),
        };

        Ok(Self {
            bind_address,
            mistral_api_key,
            chat_model,
            request_timeout,
        })
    }
}
