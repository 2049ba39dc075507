//! Configuration module for FileShare.

use serde::Deserialize;
use std::path::Path;

use crate::{FileShareError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the HTTP server.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Public base URL used when building share links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve static files (the front end).
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            public_url: default_public_url(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Which record store backs the file registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    /// SQLite database file.
    Sqlite,
    /// Process memory; records vanish on restart.
    Memory,
}

/// File registry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Record store backend.
    #[serde(default = "default_registry_backend")]
    pub backend: RegistryBackend,
    /// Path to the SQLite database file.
    #[serde(default = "default_registry_path")]
    pub path: String,
    /// Maximum number of records for the memory backend (none = unbounded).
    #[serde(default)]
    pub max_records: Option<usize>,
}

fn default_registry_backend() -> RegistryBackend {
    RegistryBackend::Sqlite
}

fn default_registry_path() -> String {
    "data/fileshare.db".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: default_registry_backend(),
            path: default_registry_path(),
            max_records: None,
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the file storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/files".to_string()
}

fn default_max_upload_size() -> u64 {
    50
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

/// Demo session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/fileshare.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// File registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Demo session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FileShareError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FileShareError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILESHARE_PUBLIC_URL`: Override the public base URL for share links
    /// - `FILESHARE_STORAGE_PATH`: Override the blob storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FILESHARE_PUBLIC_URL") {
            if !url.is_empty() {
                self.web.public_url = url;
            }
        }

        if let Ok(path) = std::env::var("FILESHARE_STORAGE_PATH") {
            if !path.is_empty() {
                self.files.storage_path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The public URL is not an http(s) URL
    /// - The maximum upload size is zero
    pub fn validate(&self) -> Result<()> {
        let url = &self.web.public_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FileShareError::Config(format!(
                "public_url must start with http:// or https:// (got {url:?})"
            )));
        }

        if self.files.max_upload_size_mb == 0 {
            return Err(FileShareError::Config(
                "max_upload_size_mb must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
