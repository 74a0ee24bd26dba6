/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_release")]
    pub release: ReleaseSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

/// Release activation schedule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseSettings {
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,

    #[serde(default = "default_sweep_timeout_seconds")]
    pub sweep_timeout_seconds: u64,

    /// Sweep once before serving, catching up on releases missed while down
    #[serde(default = "default_enabled")]
    pub sweep_on_startup: bool,

    #[serde(default = "default_enabled")]
    pub reconcile_on_startup: bool,
}

/// Longest accepted sweep interval, one week
pub const MAX_SWEEP_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

impl ReleaseSettings {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }

    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_secs(self.sweep_timeout_seconds)
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from a file (if present) and environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = PathBuf::from(path);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables, e.g. CADENCE_RELEASE__SWEEP_INTERVAL_MINUTES
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (set CADENCE_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self.release.sweep_interval_minutes == 0 {
            return Err(ServerError::Config(
                "release.sweep_interval_minutes must be greater than zero".to_string(),
            ));
        }

        if self.release.sweep_interval_minutes > MAX_SWEEP_INTERVAL_MINUTES {
            return Err(ServerError::Config(format!(
                "release.sweep_interval_minutes must be at most {MAX_SWEEP_INTERVAL_MINUTES}"
            )));
        }

        if self.release.sweep_timeout_seconds == 0 {
            return Err(ServerError::Config(
                "release.sweep_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_release() -> ReleaseSettings {
    ReleaseSettings {
        sweep_interval_minutes: default_sweep_interval_minutes(),
        sweep_timeout_seconds: default_sweep_timeout_seconds(),
        sweep_on_startup: default_enabled(),
        reconcile_on_startup: default_enabled(),
    }
}

fn default_sweep_interval_minutes() -> u64 {
    60
}

fn default_sweep_timeout_seconds() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            release: default_release(),
        }
    }
}
