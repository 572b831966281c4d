use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    /// JSON seed file; used when no database is configured
    pub seed_path: Option<String>,
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_secs: u64,
    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            seed_path: None,
            snapshot_ttl_secs: default_snapshot_ttl(),
            snapshot_capacity: default_snapshot_capacity(),
        }
    }
}

fn default_snapshot_ttl() -> u64 { 60 }
fn default_snapshot_capacity() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Hospitals returned with a critical emergency
    #[serde(default = "default_emergency_limit")]
    pub emergency_limit: usize,
    #[serde(default = "default_emergency_contact")]
    pub emergency_contact: String,
    #[serde(default = "default_ambulance_contact")]
    pub ambulance_contact: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            emergency_limit: default_emergency_limit(),
            emergency_contact: default_emergency_contact(),
            ambulance_contact: default_ambulance_contact(),
        }
    }
}

fn default_limit() -> usize { 10 }
fn default_max_limit() -> usize { 50 }
fn default_emergency_limit() -> usize { 5 }
fn default_emergency_contact() -> String { "112".to_string() }
fn default_ambulance_contact() -> String { "108".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LIFESAVER__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LIFESAVER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LIFESAVER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LIFESAVER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// `DATABASE_URL` takes precedence over any configured database URL
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}
