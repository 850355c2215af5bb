//! # Configuration Settings
//!
//! Defines the configuration structure for the Keygate backend. All settings
//! load from environment variables with sane development defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Token signing configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        };
        config.validate_all()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_all(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(Error::validation("Database URL must start with 'sqlite:'"));
        }

        if self.auth.jwt_secret.len() < 32 {
            return Err(Error::validation("JWT secret must be at least 32 characters long"));
        }

        if self.auth.refresh_ttl_seconds <= self.auth.access_ttl_seconds {
            return Err(Error::validation(
                "Refresh token lifetime must exceed access token lifetime",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080, enable_cors: true }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("KEYGATE_HOST").unwrap_or(defaults.host),
            port: env_parse("KEYGATE_PORT").unwrap_or(defaults.port),
            enable_cors: env_parse("KEYGATE_ENABLE_CORS").unwrap_or(defaults.enable_cors),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Enable automatic migrations on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://keygate.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_string("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: env_parse("KEYGATE_DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            min_connections: env_parse("KEYGATE_DB_MIN_CONNECTIONS")
                .unwrap_or(defaults.min_connections),
            connect_timeout_seconds: env_parse("KEYGATE_DB_CONNECT_TIMEOUT")
                .unwrap_or(defaults.connect_timeout_seconds),
            idle_timeout_seconds: env_parse("KEYGATE_DB_IDLE_TIMEOUT")
                .unwrap_or(defaults.idle_timeout_seconds),
            auto_migrate: env_parse("KEYGATE_DB_AUTO_MIGRATE").unwrap_or(defaults.auto_migrate),
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// HMAC signing secret for both token classes
    #[validate(length(min = 32, message = "JWT secret must be at least 32 characters"))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[validate(range(min = 1, message = "Access token lifetime must be positive"))]
    pub access_ttl_seconds: u64,

    /// Refresh token lifetime in seconds
    #[validate(range(min = 1, message = "Refresh token lifetime must be positive"))]
    pub refresh_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_ttl_seconds: 300,       // 5 minutes
            refresh_ttl_seconds: 86_400,   // 24 hours
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let jwt_secret = env_string("KEYGATE_JWT_SECRET")
            .ok_or_else(|| Error::config("KEYGATE_JWT_SECRET must be set"))?;

        Ok(Self {
            jwt_secret,
            access_ttl_seconds: env_parse("KEYGATE_ACCESS_TTL_SECONDS")
                .unwrap_or(defaults.access_ttl_seconds),
            refresh_ttl_seconds: env_parse("KEYGATE_REFRESH_TTL_SECONDS")
                .unwrap_or(defaults.refresh_ttl_seconds),
        })
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter directive, e.g. `info` or `keygate=debug,sqlx=warn`
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines
    pub json_logs: bool,

    /// Service name attached to log output
    pub service_name: String,

    /// Enable the Prometheus metrics exporter
    pub enable_metrics: bool,

    /// Metrics exporter listen port
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "keygate".to_string(),
            enable_metrics: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env_string("KEYGATE_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: env_parse("KEYGATE_JSON_LOGS").unwrap_or(defaults.json_logs),
            service_name: env_string("KEYGATE_SERVICE_NAME").unwrap_or(defaults.service_name),
            enable_metrics: env_parse("KEYGATE_ENABLE_METRICS").unwrap_or(defaults.enable_metrics),
            metrics_port: env_parse("KEYGATE_METRICS_PORT").unwrap_or(defaults.metrics_port),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.parse().ok())
}
