//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The [`Registry`] sits behind one `parking_lot::Mutex`. Every handler
//! takes the lock, performs exactly one registry call, and drops it
//! before building the response, so operations are serialized and no
//! lock is held across an `.await`.

use std::path::PathBuf;
use std::sync::Arc;

use lacns_registry::Registry;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Path to a registry snapshot (JSON) to resume from.
    pub snapshot: Option<PathBuf>,
    /// Path to a registry configuration file (YAML or JSON).
    pub registry_config: Option<PathBuf>,
    /// Administrator identity used when no configuration file is given.
    pub administrator: Option<String>,
    /// Shared bearer secret. If `None`, bearer authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("snapshot", &self.snapshot)
            .field("registry_config", &self.registry_config)
            .field("administrator", &self.administrator)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            snapshot: None,
            registry_config: None,
            administrator: None,
            auth_token: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from `LACNS_*` environment variables.
    ///
    /// An unparseable `LACNS_PORT` falls back to 8080; empty values are
    /// treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            port: get("LACNS_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            snapshot: get("LACNS_SNAPSHOT").map(PathBuf::from),
            registry_config: get("LACNS_CONFIG").map(PathBuf::from),
            administrator: get("LACNS_ADMIN"),
            auth_token: get("LACNS_AUTH_TOKEN"),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The registry. Single lock; see module docs.
    pub registry: Arc<Mutex<Registry>>,
    /// Prometheus handle rendered at `/metrics`.
    pub metrics: PrometheusHandle,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &*self.registry.lock())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Wrap a registry with default configuration.
    ///
    /// The metrics handle belongs to a recorder that is not installed
    /// globally; use [`AppState::with_metrics`] to attach the process-wide one.
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, AppConfig::default())
    }

    /// Wrap a registry with the given configuration.
    pub fn with_config(registry: Registry, config: AppConfig) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            config,
        }
    }

    /// Replace the metrics handle.
    pub fn with_metrics(mut self, metrics: PrometheusHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8080);
        assert!(config.snapshot.is_none());
        assert!(config.registry_config.is_none());
        assert!(config.administrator.is_none());
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn env_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LACNS_PORT", "9090"),
            ("LACNS_SNAPSHOT", "/var/lib/lacns/snapshot.json"),
            ("LACNS_CONFIG", "/etc/lacns/registry.yaml"),
            ("LACNS_ADMIN", "0xadmin"),
            ("LACNS_AUTH_TOKEN", "s3cret"),
        ]));
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.snapshot,
            Some(PathBuf::from("/var/lib/lacns/snapshot.json"))
        );
        assert_eq!(
            config.registry_config,
            Some(PathBuf::from("/etc/lacns/registry.yaml"))
        );
        assert_eq!(config.administrator.as_deref(), Some("0xadmin"));
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn bad_port_and_empty_values_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LACNS_PORT", "http"),
            ("LACNS_AUTH_TOKEN", "  "),
        ]));
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let config = AppConfig {
            auth_token: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
