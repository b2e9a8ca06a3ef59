use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// One year.
pub const MAX_ACCESS_EXPIRY_MINUTES: i64 = 60 * 24 * 365;

/// Ten years.
pub const MAX_REFRESH_EXPIRY_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub accounts: AccountConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_max_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When present it wins over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    pub conn_max_lifetime_secs: u64,
    pub conn_max_idle_time_secs: u64,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub key: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Password assigned to users created through the admin API.
    pub default_password: String,
    /// Language used for messages when the caller has none.
    pub default_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub photo_dir: PathBuf,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_KEY must not be empty")]
    EmptyJwtKey,

    #[error("token lifetimes must be positive")]
    InvalidTokenLifetime,

    #[error("token lifetimes must not exceed one year (access) or ten years (refresh)")]
    TokenLifetimeTooLong,

    #[error("DEFAULT_LANG must not be empty")]
    EmptyDefaultLang,

    #[error("DEFAULT_PASSWORD must not be empty")]
    EmptyDefaultPassword,

    #[error("DB_MAX_OPEN_CONNS must be at least 1")]
    InvalidPoolSize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("COLLAPP_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("UPLOAD_MAX_BYTES") {
            self.server.upload_max_bytes = v.parse().unwrap_or(self.server.upload_max_bytes);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASS") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DB_MAX_OPEN_CONNS") {
            self.database.max_open_conns = v.parse().unwrap_or(self.database.max_open_conns);
        }
        if let Some(v) = lookup("DB_MAX_IDLE_CONNS") {
            self.database.max_idle_conns = v.parse().unwrap_or(self.database.max_idle_conns);
        }
        if let Some(v) = lookup("DB_CONN_MAX_LIFETIME_SECS") {
            self.database.conn_max_lifetime_secs =
                v.parse().unwrap_or(self.database.conn_max_lifetime_secs);
        }
        if let Some(v) = lookup("DB_CONN_MAX_IDLE_TIME_SECS") {
            self.database.conn_max_idle_time_secs =
                v.parse().unwrap_or(self.database.conn_max_idle_time_secs);
        }
        if let Some(v) = lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // JWT overrides
        if let Some(v) = lookup("JWT_KEY") {
            self.jwt.key = v;
        }
        if let Some(v) = lookup("JWT_ACCESS_EXPIRY_MINUTES") {
            self.jwt.access_expiry_minutes = v.parse().unwrap_or(self.jwt.access_expiry_minutes);
        }
        if let Some(v) = lookup("JWT_REFRESH_EXPIRY_HOURS") {
            self.jwt.refresh_expiry_hours = v.parse().unwrap_or(self.jwt.refresh_expiry_hours);
        }

        // Account defaults
        if let Some(v) = lookup("DEFAULT_PASSWORD") {
            self.accounts.default_password = v;
        }
        if let Some(v) = lookup("DEFAULT_LANG") {
            self.accounts.default_lang = v;
        }

        if let Some(v) = lookup("FILES_PHOTO") {
            self.files.photo_dir = PathBuf::from(v);
        }

        self
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.key.trim().is_empty() {
            return Err(ConfigError::EmptyJwtKey);
        }
        if self.jwt.access_expiry_minutes <= 0 || self.jwt.refresh_expiry_hours <= 0 {
            return Err(ConfigError::InvalidTokenLifetime);
        }
        if self.jwt.access_expiry_minutes > MAX_ACCESS_EXPIRY_MINUTES
            || self.jwt.refresh_expiry_hours > MAX_REFRESH_EXPIRY_HOURS
        {
            return Err(ConfigError::TokenLifetimeTooLong);
        }
        if self.accounts.default_lang.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultLang);
        }
        if self.accounts.default_password.is_empty() {
            return Err(ConfigError::EmptyDefaultPassword);
        }
        if self.database.max_open_conns == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                upload_max_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                url: None,
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "collapp".to_string(),
                max_open_conns: 10,
                max_idle_conns: 2,
                conn_max_lifetime_secs: 1800,
                conn_max_idle_time_secs: 600,
                acquire_timeout_secs: 30,
            },
            jwt: JwtConfig {
                key: "collapp-development-key".to_string(),
                access_expiry_minutes: 60,
                refresh_expiry_hours: 24 * 7, // 1 week
            },
            accounts: AccountConfig {
                default_password: "changeme".to_string(),
                default_lang: "en".to_string(),
            },
            files: FilesConfig {
                photo_dir: PathBuf::from("uploads/photos"),
            },
        }
    }

    pub fn production() -> Self {
        let development = Self::development();
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_open_conns: 50,
                max_idle_conns: 5,
                acquire_timeout_secs: 5,
                ..development.database
            },
            jwt: JwtConfig {
                // Production must bring its own key
                key: String::new(),
                access_expiry_minutes: 15,
                refresh_expiry_hours: 24 * 7,
            },
            ..development
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
