//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not fatal: a warning is logged and compiled
//! defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "MLA_CONFIG";
/// Environment variable overriding the service base URL
pub const SERVICE_URL_ENV: &str = "MLA_SERVICE_URL";

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_RESTORE_DELAY_MS: u64 = 1000;
const DEFAULT_CLEANUP_DELAY_MS: u64 = 5000;

/// Bootstrap configuration loaded from `mla.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the Analysis/Artifact service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Send goal/genre/notes form fields alongside the uploaded file
    #[serde(default)]
    pub include_preferences: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Artifact download pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Delay before the download button is restored
    #[serde(default = "default_restore_delay_ms")]
    pub restore_delay_ms: u64,

    /// Delay from download start until the artifact cleanup request
    #[serde(default = "default_cleanup_delay_ms")]
    pub cleanup_delay_ms: u64,

    /// Where downloaded artifacts are saved (current directory if unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Session-scoped result storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding one sub-directory per session
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_restore_delay_ms() -> u64 {
    DEFAULT_RESTORE_DELAY_MS
}

fn default_cleanup_delay_ms() -> u64 {
    DEFAULT_CLEANUP_DELAY_MS
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            include_preferences: false,
            logging: LoggingConfig::default(),
            download: DownloadConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            restore_delay_ms: DEFAULT_RESTORE_DELAY_MS,
            cleanup_delay_ms: DEFAULT_CLEANUP_DELAY_MS,
            output_dir: None,
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load config with graceful degradation
    ///
    /// An explicit path (CLI or `MLA_CONFIG`) that cannot be read is an error;
    /// a missing default config file only logs a warning.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            info!("Loading config from {} ({})", path.display(), CONFIG_PATH_ENV);
            return Self::from_file(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            Some(path) => {
                warn!("Config file not found at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Resolve the service URL: CLI → ENV → TOML
    pub fn resolve_service_url(&self, cli_arg: Option<&str>) -> String {
        if let Some(url) = cli_arg {
            return url.to_string();
        }
        if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.service_url.clone()
    }

    /// Session storage root, falling back to the platform data directory
    pub fn session_root(&self) -> PathBuf {
        self.session
            .dir
            .clone()
            .unwrap_or_else(default_session_root)
    }
}

/// Default config file location: `<config_dir>/mla/mla.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mla").join("mla.toml"))
}

/// Default session root: `<data_local_dir>/mla/sessions`
fn default_session_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mla").join("sessions"))
        .unwrap_or_else(|| PathBuf::from("./mla_data/sessions"))
}
