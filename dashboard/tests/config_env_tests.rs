//! Tests for configuration and transport selection from the environment.

mod support;

use std::path::PathBuf;
use std::str::FromStr;

use mealdash::client::{Transport, TransportFactory, TransportType};
use mealdash::config::{
    ClientConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CACHE_TTL_SECS, ENV_TIMEOUT_SECS,
    ENV_TOKEN_PATH, ENV_TRANSPORT,
};
use mealdash::DashboardError;

#[test]
fn test_transport_type_from_str() {
    assert_eq!(TransportType::from_str("http").unwrap(), TransportType::Http);
    assert_eq!(TransportType::from_str("LOCAL").unwrap(), TransportType::Local);

    let err = TransportType::from_str("ftp").unwrap_err();
    assert!(err.contains("Unknown transport type"));
}

#[test]
fn test_transport_type_from_env_default() {
    support::with_mealdash_env(&[], || {
        assert_eq!(TransportType::from_env(), TransportType::Http);
    });
}

#[test]
fn test_transport_type_from_env_invalid_falls_back() {
    support::with_mealdash_env(&[(ENV_TRANSPORT, "smoke-signal")], || {
        assert_eq!(TransportType::from_env(), TransportType::Http);
    });
}

#[test]
fn test_config_from_env_defaults() {
    support::with_mealdash_env(&[], || {
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.token_path, None);
        assert_eq!(config.transport, TransportType::Http);
    });
}

#[test]
fn test_config_from_env_overrides() {
    support::with_mealdash_env(
        &[
            (ENV_BASE_URL, "http://127.0.0.1:4000/api"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_TOKEN_PATH, "/var/lib/mealdash/token"),
            (ENV_TRANSPORT, "local"),
            (ENV_CACHE_TTL_SECS, "0"),
        ],
        || {
            let config = ClientConfig::from_env().unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:4000/api");
            assert_eq!(config.timeout_secs, 3);
            assert_eq!(config.token_path, Some(PathBuf::from("/var/lib/mealdash/token")));
            assert_eq!(config.transport, TransportType::Local);
            assert_eq!(config.cache_ttl_secs, 0);
        },
    );
}

#[test]
fn test_config_from_env_rejects_bad_timeout() {
    support::with_mealdash_env(&[(ENV_TIMEOUT_SECS, "-1")], || {
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, DashboardError::Configuration { .. }));
    });
}

#[test]
fn test_config_from_env_rejects_zero_timeout() {
    support::with_mealdash_env(&[(ENV_TIMEOUT_SECS, "0")], || {
        assert!(ClientConfig::from_env().is_err());
    });
}

#[test]
fn test_factory_from_env_local() {
    support::with_mealdash_env(&[(ENV_TRANSPORT, "local")], || {
        let transport = TransportFactory::from_env().unwrap();
        assert_eq!(transport.name(), "local");
    });
}
