use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Missing or unusable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    /// Installs the HTTP trace layer
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC signing secret; tokens can be neither issued nor verified without it.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub jwt_expiry_hours: u64,
    pub jwt_issuer: String,
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            ..Self::defaults()
        }
    }

    fn defaults() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiry_hours: 24,
            jwt_issuer: "notes-api".to_string(),
            cors_origins: Vec::new(),
        }
    }

    /// The signing secret, or `ConfigError` when absent.
    pub fn require_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .ok_or(ConfigError::Missing("JWT_SECRET"))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from a read-only key lookup.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific keys
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("JWT_EXPIRATION_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                ..SecurityConfig::defaults()
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig::defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_keys() {
        let config = from_pairs(&[]);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert_eq!(config.security.jwt_issuer, "notes-api");
        assert_eq!(config.api.port, 3000);
        assert_eq!(
            config.security.require_secret(),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/notes"),
        ]);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.security.require_secret(), Ok("s3cret"));
        assert_eq!(config.security.jwt_expiry_hours, 2);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/notes"));
    }

    #[test]
    fn test_bad_expiry_keeps_default() {
        let config = from_pairs(&[("JWT_EXPIRATION_HOURS", "soon")]);
        assert_eq!(config.security.jwt_expiry_hours, 24);
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let config = from_pairs(&[("JWT_SECRET", "")]);
        assert!(config.security.jwt_secret.is_none());
    }
}
