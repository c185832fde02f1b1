//! Transport factory for dependency injection.
//!
//! Picks the transport and token store from a [`ClientConfig`].

use std::str::FromStr;
use std::sync::Arc;

use super::local::LocalTransport;
use super::token::{FileTokenStore, MemoryTokenStore, TokenStore};
use super::transport::Transport;
use crate::config::{ClientConfig, ENV_TRANSPORT};
use crate::error::DashboardResult;

/// Transport type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    /// Live backend over HTTP(S)
    Http,
    /// In-memory routes seeded with sample data
    Local,
}

impl FromStr for TransportType {
    type Err = String;

    /// Parse a transport type ("http", "https", "local"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "https" => Ok(Self::Http),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown transport type: {}", s)),
        }
    }
}

impl TransportType {
    /// Read `MEALDASH_TRANSPORT`. Defaults to HTTP if unset or invalid.
    pub fn from_env() -> Self {
        std::env::var(ENV_TRANSPORT)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Http)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Local => "local",
        }
    }
}

/// Factory for transport instances.
///
/// # Example
/// ```no_run
/// use mealdash::client::TransportFactory;
/// use mealdash::config::ClientConfig;
///
/// let config = ClientConfig::from_env()?;
/// let transport = TransportFactory::create(&config)?;
/// # Ok::<(), mealdash::DashboardError>(())
/// ```
pub struct TransportFactory;

impl TransportFactory {
    /// Create the transport named by `config.transport`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn Transport>)`
    /// * `Err(DashboardError::Configuration)` if HTTP is requested but the
    ///   crate was built without the `http-transport` feature
    pub fn create(config: &ClientConfig) -> DashboardResult<Arc<dyn Transport>> {
        match config.transport {
            TransportType::Http => Self::create_http(config),
            TransportType::Local => Ok(Self::create_local()),
        }
    }

    #[cfg(feature = "http-transport")]
    fn create_http(config: &ClientConfig) -> DashboardResult<Arc<dyn Transport>> {
        let tokens = Self::token_store(config);
        let transport = super::http::HttpTransport::new(config, tokens)?;
        log::debug!("using http transport at {}", transport.base_url());
        Ok(Arc::new(transport))
    }

    #[cfg(not(feature = "http-transport"))]
    fn create_http(_config: &ClientConfig) -> DashboardResult<Arc<dyn Transport>> {
        Err(crate::error::DashboardError::configuration(
            "HTTP transport requires the `http-transport` feature",
        ))
    }

    /// In-memory transport seeded with sample responses for every endpoint.
    pub fn create_local() -> Arc<dyn Transport> {
        Arc::new(LocalTransport::with_sample_data())
    }

    /// File-backed store when `token_path` is set, otherwise in-memory.
    pub fn token_store(config: &ClientConfig) -> Arc<dyn TokenStore> {
        match &config.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Create a transport from `MEALDASH_*` environment variables.
    pub fn from_env() -> DashboardResult<Arc<dyn Transport>> {
        let config = ClientConfig::from_env()?;
        Self::create(&config)
    }
}
