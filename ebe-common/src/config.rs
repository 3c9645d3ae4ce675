//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line arguments and environment variables arrive together as
//! [`ConfigOverrides`] (the binaries use clap's `env` fallback), so this
//! module only merges overrides, file and defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_ADDRESS_VALIDATION_ENDPOINT: &str =
    "https://addressvalidation.googleapis.com/v1:validateAddress";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Validation requests allowed per client per period
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 12;
/// One day
pub const DEFAULT_RATE_LIMIT_PERIOD_SECS: u64 = 86_400;
/// How often idle rate-limit entries are dropped
pub const DEFAULT_RATE_LIMIT_PRUNE_INTERVAL_SECS: u64 = 600;

/// Configuration file as written on disk
///
/// Every key is optional; absent keys fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub bind_address: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Address Validation API key
    #[serde(default)]
    pub google_maps_api_key: Option<String>,

    #[serde(default)]
    pub address_validation_endpoint: Option<String>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-client quota on `/api/validate-addresses`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_allowed_requests")]
    pub allowed_requests: u32,

    #[serde(default = "default_period_secs")]
    pub period_secs: u64,

    /// Key clients on the last `x-forwarded-for` hop (then `x-real-ip`),
    /// as appended by the reverse proxy in front of the service. When
    /// false, only the socket peer address is used.
    #[serde(default = "default_trust_forwarded_for")]
    pub trust_forwarded_for: bool,

    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            allowed_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            period_secs: DEFAULT_RATE_LIMIT_PERIOD_SECS,
            trust_forwarded_for: true,
            prune_interval_secs: DEFAULT_RATE_LIMIT_PRUNE_INTERVAL_SECS,
        }
    }
}

impl RateLimitConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_allowed_requests() -> u32 {
    DEFAULT_RATE_LIMIT_REQUESTS
}

fn default_period_secs() -> u64 {
    DEFAULT_RATE_LIMIT_PERIOD_SECS
}

fn default_trust_forwarded_for() -> bool {
    true
}

fn default_prune_interval_secs() -> u64 {
    DEFAULT_RATE_LIMIT_PRUNE_INTERVAL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load the configuration file
    ///
    /// An explicit path must exist. Without one, the platform default
    /// locations are tried and a missing file yields defaults with a warning.
    /// A file that exists but does not parse is always an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    warn!("No config file found, using compiled defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::from_file(&path)
    }

    /// Parse a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Locate the configuration file for the platform
///
/// Linux tries `~/.config/ebe/config.toml` then `/etc/ebe/config.toml`;
/// other platforms use the user config directory only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("ebe").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/ebe/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub google_maps_api_key: Option<String>,
    pub address_validation_endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration for the address validation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub google_maps_api_key: String,
    pub address_validation_endpoint: String,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Merge overrides over the file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Result<Self> {
        let google_maps_api_key = overrides
            .google_maps_api_key
            .or(file.google_maps_api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "google_maps_api_key is not set (use --google-maps-api-key, \
                     GOOGLE_MAPS_API_KEY or the config file)"
                        .to_string(),
                )
            })?;

        if file.rate_limit.allowed_requests == 0 {
            return Err(Error::Config(
                "rate_limit.allowed_requests must be greater than zero".to_string(),
            ));
        }
        if file.rate_limit.period_secs == 0 {
            return Err(Error::Config(
                "rate_limit.period_secs must be greater than zero".to_string(),
            ));
        }
        if file.rate_limit.prune_interval_secs == 0 {
            return Err(Error::Config(
                "rate_limit.prune_interval_secs must be greater than zero".to_string(),
            ));
        }

        let logging = match overrides.log_level {
            Some(level) => LoggingConfig { level },
            None => file.logging,
        };

        Ok(Self {
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            google_maps_api_key,
            address_validation_endpoint: overrides
                .address_validation_endpoint
                .or(file.address_validation_endpoint)
                .unwrap_or_else(|| DEFAULT_ADDRESS_VALIDATION_ENDPOINT.to_string()),
            request_timeout: Duration::from_secs(
                overrides
                    .request_timeout_secs
                    .or(file.request_timeout_secs)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            rate_limit: file.rate_limit,
            logging,
        })
    }

    /// `host:port` to bind the listener to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
