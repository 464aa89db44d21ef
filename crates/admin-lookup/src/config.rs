//! Configuration for the admin lookup service.

use anyhow::{Context, Result};
use firestore_client::{DEFAULT_BASE_URL, DEFAULT_DATABASE, DEFAULT_METADATA_TOKEN_URL};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosting limits of the callable function
    #[serde(default)]
    pub function: FunctionConfig,

    /// Admin store selection
    #[serde(default)]
    pub store: StoreConfig,

    /// Firestore configuration
    #[serde(default)]
    pub firestore: FirestoreConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Answer browser preflight requests
    #[serde(default = "default_true")]
    pub cors: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    /// Name the function is exposed under
    #[serde(default = "default_function_name")]
    pub name: String,

    /// Maximum execution time per invocation
    #[serde(default = "default_function_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Memory allocation granted by the host (informational)
    #[serde(default = "default_memory")]
    pub memory: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Which store backs admin lookups
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Comma-separated admin keys for the memory backend
    #[serde(default)]
    pub seed_admins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    #[serde(default)]
    pub project_id: String,

    /// Database id
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding admin documents
    #[serde(default = "default_collection")]
    pub collection: String,

    /// REST endpoint
    #[serde(default = "default_firestore_url")]
    pub base_url: String,

    /// Emulator `host:port`; overrides `base_url` and credentials when set
    #[serde(default)]
    pub emulator_host: Option<String>,

    /// Fixed access token; the metadata server is used when absent
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Metadata server token endpoint
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Per-request timeout
    #[serde(default = "default_firestore_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute (0 disables limiting)
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            cors: true,
        }
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: default_function_name(),
            timeout: default_function_timeout(),
            memory: default_memory(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            seed_admins: String::new(),
        }
    }
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: default_database(),
            collection: default_collection(),
            base_url: default_firestore_url(),
            emulator_host: None,
            access_token: None,
            metadata_url: default_metadata_url(),
            timeout: default_firestore_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_function_name() -> String {
    crate::api::DEFAULT_FUNCTION_NAME.into()
}

fn default_function_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_memory() -> String {
    "256MiB".into()
}

fn default_backend() -> StoreBackend {
    StoreBackend::Firestore
}

fn default_database() -> String {
    DEFAULT_DATABASE.into()
}

fn default_collection() -> String {
    crate::store::ADMINS_COLLECTION.into()
}

fn default_firestore_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_TOKEN_URL.into()
}

fn default_firestore_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_global_rpm() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_env()
    }

    /// Build configuration from the process environment only.
    pub fn from_env() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Phone keys like +233... must stay strings
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize::<Self>()
            .context("Failed to deserialize configuration")?
            .validated()
    }

    fn validated(self) -> Result<Self> {
        if self.store.backend == StoreBackend::Firestore
            && self.firestore.project_id.is_empty()
        {
            anyhow::bail!("FIRESTORE__PROJECT_ID is required for the firestore store backend");
        }
        Ok(self)
    }

    /// Base URL to use for Firestore, honoring the emulator override.
    pub fn firestore_base_url(&self) -> String {
        match &self.firestore.emulator_host {
            Some(host) => format!("http://{}", host),
            None => self.firestore.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str(r#"{"firestore": {"project_id": "demo"}}"#).unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors);
        assert_eq!(config.function.name, "checkAdminExists");
        assert_eq!(config.function.timeout, Duration::from_secs(60));
        assert_eq!(config.function.memory, "256MiB");
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert_eq!(config.firestore.collection, "Admins");
        assert_eq!(config.firestore.database, "(default)");
        assert_eq!(config.rate_limit.global_per_minute, 600);
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_firestore_backend_requires_project() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_memory_backend_without_project() {
        let config: Config = serde_json::from_str(
            r#"{"store": {"backend": "memory", "seed_admins": "+233244123456"}}"#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_humantime_durations() {
        let config: Config = serde_json::from_str(
            r#"{"function": {"timeout": "90s"}, "firestore": {"timeout": "500ms"}}"#,
        )
        .unwrap();

        assert_eq!(config.function.timeout, Duration::from_secs(90));
        assert_eq!(config.firestore.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_emulator_overrides_base_url() {
        let config: Config = serde_json::from_str(
            r#"{"firestore": {"project_id": "demo", "emulator_host": "localhost:8181"}}"#,
        )
        .unwrap();

        assert_eq!(config.firestore_base_url(), "http://localhost:8181");
    }
}
