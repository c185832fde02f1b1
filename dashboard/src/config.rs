//! Client configuration.
//!
//! Settings come from `MEALDASH_*` environment variables or a `mealdash.toml`
//! file with `[client]` and `[cache]` tables. Every key has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::factory::TransportType;
use crate::error::{DashboardError, DashboardResult};

pub const DEFAULT_BASE_URL: &str = "https://backend-t08o.onrender.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;
pub const DEFAULT_ANALYTICS_REFRESH_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "MEALDASH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEALDASH_TIMEOUT_SECS";
pub const ENV_TOKEN_PATH: &str = "MEALDASH_TOKEN_PATH";
pub const ENV_TRANSPORT: &str = "MEALDASH_TRANSPORT";
pub const ENV_CACHE_TTL_SECS: &str = "MEALDASH_CACHE_TTL_SECS";

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// File-backed token store location; in-memory store when `None`.
    pub token_path: Option<PathBuf>,
    pub transport: TransportType,
    /// Analytics is refetched at least this often.
    pub analytics_refresh_secs: u64,
    /// Other queries stay fresh this long unless invalidated.
    pub cache_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_path: None,
            transport: TransportType::Http,
            analytics_refresh_secs: DEFAULT_ANALYTICS_REFRESH_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `MEALDASH_*` environment variables.
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` with defaults for unset variables
    /// * `Err(DashboardError::Configuration)` if a number or transport name is invalid
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(path) = get(ENV_TOKEN_PATH) {
            config.token_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = get(ENV_TRANSPORT) {
            config.transport = raw.parse::<TransportType>().map_err(DashboardError::configuration)?;
        }
        if let Some(raw) = get(ENV_CACHE_TTL_SECS) {
            config.cache_ttl_secs = parse_secs(ENV_CACHE_TTL_SECS, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` if successful
    /// * `Err(DashboardError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DashboardError::configuration(format!("Failed to read config file: {}", e))
        })?;
        let file: ConfigFile = toml::from_str(&content)?;
        file.into_config()
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `mealdash.toml` in:
    /// 1. Current directory
    /// 2. `dashboard/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> DashboardResult<Self> {
        match default_config_path() {
            Some(path) => {
                log::debug!("loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => Err(DashboardError::configuration(
                "No mealdash.toml found in standard locations",
            )),
        }
    }

    /// Config file if one exists, else the environment.
    pub fn load() -> DashboardResult<Self> {
        if default_config_path().is_some() {
            Self::from_default_location()
        } else {
            Self::from_env()
        }
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.transport == TransportType::Http
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(DashboardError::configuration(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(DashboardError::configuration("timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn analytics_refresh(&self) -> Duration {
        Duration::from_secs(self.analytics_refresh_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    [
        PathBuf::from("mealdash.toml"),
        PathBuf::from("dashboard/mealdash.toml"),
        PathBuf::from("../mealdash.toml"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

fn parse_secs(name: &str, raw: &str) -> DashboardResult<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        DashboardError::configuration(format!("{} must be a whole number of seconds: {}", name, e))
    })
}

/// On-disk layout of `mealdash.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    #[serde(default = "default_transport")]
    pub transport: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token_path: None,
            transport: default_transport(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_analytics_refresh_secs")]
    pub analytics_refresh_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            analytics_refresh_secs: default_analytics_refresh_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_transport() -> String {
    "http".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_analytics_refresh_secs() -> u64 {
    DEFAULT_ANALYTICS_REFRESH_SECS
}

impl ConfigFile {
    pub fn into_config(self) -> DashboardResult<ClientConfig> {
        let transport = self.client.transport.parse::<TransportType>().map_err(|e| {
            DashboardError::configuration(format!("Invalid transport type: {}", e))
        })?;
        let config = ClientConfig {
            base_url: self.client.base_url,
            timeout_secs: self.client.timeout_secs,
            token_path: self.client.token_path,
            transport,
            analytics_refresh_secs: self.cache.analytics_refresh_secs,
            cache_ttl_secs: self.cache.ttl_secs,
        };
        config.validate()?;
        Ok(config)
    }
}
