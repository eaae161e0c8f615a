//! Application configuration management.

use serde::Deserialize;

use crate::jwt::JwtAlgorithm;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Document cipher configuration.
    pub cipher: CipherConfig,
    /// Environment selected through `RUN_MODE`.
    #[serde(skip)]
    pub environment: Environment,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development; error responses include details.
    #[default]
    Development,
    /// Any other run mode; error responses are generic.
    Production,
}

impl Environment {
    /// Maps a `RUN_MODE` value to an environment.
    #[must_use]
    pub fn from_run_mode(run_mode: &str) -> Self {
        if run_mode.eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Returns true when error details may be sent to clients.
    #[must_use]
    pub const fn exposes_error_details(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Maximum accepted request body size.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_body_limit() -> usize {
    512_000
}

/// Which store backs the resource repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through SeaORM.
    #[default]
    Postgres,
    /// Process-local store, lost on restart.
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database connection URL (required for Postgres).
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT verification settings.
#[derive(Clone, Deserialize)]
pub struct JwtSettings {
    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: JwtAlgorithm,
    /// Shared secret (HS256) or base64-encoded PEM public key (RS256).
    pub secret: String,
    /// Access token expiration in seconds, used when issuing tokens.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("algorithm", &self.algorithm)
            .field("secret", &"[hidden]")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .finish()
    }
}

/// Document cipher settings.
#[derive(Clone, Deserialize)]
pub struct CipherConfig {
    /// Secret the encryption key is derived from.
    pub secret: String,
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_with(&run_mode, env_source())
    }

    /// Loads configuration for `run_mode`, taking overrides from `env`.
    fn load_with(run_mode: &str, env: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(env)
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.environment = Environment::from_run_mode(run_mode);
        Ok(app_config)
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("KASSABOK").separator("__")
}
