//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Upper bound for a single page of notifications.
pub const MAX_NOTIFICATION_PAGE: u64 = 50;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Notification feed configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Notification feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Page size used when a caller does not ask for one.
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
        }
    }
}

impl NotificationConfig {
    /// Page size actually served, never above [`MAX_NOTIFICATION_PAGE`].
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.page_limit.clamp(1, MAX_NOTIFICATION_PAGE)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_page_limit() -> u64 {
    MAX_NOTIFICATION_PAGE
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, exported into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `ROOMSHARE_ENV`)
    /// 4. Environment variables with `ROOMSHARE__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("ROOMSHARE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ROOMSHARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("ROOMSHARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_limit_is_capped() {
        let config = NotificationConfig { page_limit: 500 };
        assert_eq!(config.effective_limit(), MAX_NOTIFICATION_PAGE);

        let config = NotificationConfig { page_limit: 0 };
        assert_eq!(config.effective_limit(), 1);

        let config = NotificationConfig { page_limit: 20 };
        assert_eq!(config.effective_limit(), 20);
    }

    #[test]
    fn test_defaults_from_minimal_source() {
        let config: Config = config::Config::builder()
            .set_override("server.url", "https://rooms.example")
            .unwrap()
            .set_override("database.url", "postgres://localhost/roomshare")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.notifications.page_limit, MAX_NOTIFICATION_PAGE);
    }
}
