//! Application configuration.
//!
//! Configuration is read from environment variables with the `CHAT` prefix
//! and `__` as the nesting separator, e.g. `CHAT__SERVER__PORT=8080` or
//! `CHAT__AUTH__TOKEN_KEY=...`. A `.env` file is honoured when present.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("'{0}' is required, but was empty or missing")]
    MissingRequired(&'static str),
}

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listen address.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging defaults.
    #[serde(default)]
    pub log: LogConfig,
    /// Bearer-token settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC key used to sign tokens. Required; there is no usable default.
    #[serde(default)]
    pub token_key: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiration_secs")]
    pub token_expiration_secs: u64,
}

impl AuthConfig {
    pub fn token_expiration(&self) -> Duration {
        Duration::from_secs(self.token_expiration_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: String::new(),
            token_expiration_secs: default_token_expiration_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw = config::Config::builder()
            .add_source(config::Environment::with_prefix("CHAT").separator("__"))
            .build()?;
        let config: AppConfig = raw.try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot safely run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_key.is_empty() {
            return Err(ConfigError::MissingRequired("CHAT__AUTH__TOKEN_KEY"));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_expiration_secs() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // given:
        let config = AppConfig {
            server: ServerConfig::default(),
            log: LogConfig::default(),
            auth: AuthConfig::default(),
        };

        // when / then:
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.auth.token_expiration(), Duration::from_secs(3600));
    }

    #[test]
    fn test_validate_requires_token_key() {
        // given:
        let mut config = AppConfig {
            server: ServerConfig::default(),
            log: LogConfig::default(),
            auth: AuthConfig::default(),
        };

        // when / then:
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired("CHAT__AUTH__TOKEN_KEY"))
        ));

        config.auth.token_key = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_expiration_from_secs() {
        // given:
        let auth = AuthConfig {
            token_key: "secret".to_string(),
            token_expiration_secs: 120,
        };

        // when / then:
        assert_eq!(auth.token_expiration(), Duration::from_secs(120));
    }
}
