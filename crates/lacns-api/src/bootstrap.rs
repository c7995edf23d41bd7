//! # Registry Bootstrap
//!
//! Builds the [`Registry`] for the server process.
//!
//! 1. `LACNS_SNAPSHOT` set: resume from a snapshot saved from
//!    `GET /v1/admin/snapshot` (records, fee balance and counter included).
//! 2. Otherwise `LACNS_CONFIG` set: genesis from the registry configuration file.
//! 3. Otherwise `LACNS_ADMIN` set: genesis with the default configuration
//!    for that administrator.
//! 4. None of these: refuse to start.
//!
//! The registry keeps its default collaborators: wall clock, tracing
//! notifications, and [`TracingPayout`] for withdrawals. The payout only
//! logs the transfer; settlement with a real currency ledger happens
//! outside this process.
//!
//! [`TracingPayout`]: lacns_registry::TracingPayout

use lacns_core::{Identity, ValidationError};
use lacns_registry::{ConfigError, Registry, RegistryConfig, RegistrySnapshot};

use crate::state::AppConfig;

/// Errors during registry bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Neither a configuration file nor an administrator was supplied.
    #[error("no registry configuration: set LACNS_CONFIG or LACNS_ADMIN")]
    MissingConfiguration,

    /// The administrator identity is malformed.
    #[error("invalid LACNS_ADMIN: {0}")]
    Administrator(#[from] ValidationError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolve the genesis configuration named by `config`.
pub fn registry_config(config: &AppConfig) -> Result<RegistryConfig, BootstrapError> {
    if let Some(path) = &config.registry_config {
        tracing::info!(path = %path.display(), "loading registry configuration");
        return Ok(RegistryConfig::load(path)?);
    }
    match &config.administrator {
        Some(admin) => Ok(RegistryConfig::new(Identity::new(admin.as_str())?)),
        None => Err(BootstrapError::MissingConfiguration),
    }
}

/// Build the registry named by `config`, resuming from a snapshot when
/// one is given.
pub fn bootstrap(config: &AppConfig) -> Result<Registry, BootstrapError> {
    let registry = match &config.snapshot {
        Some(path) => {
            tracing::info!(path = %path.display(), "restoring registry snapshot");
            Registry::restore(RegistrySnapshot::load(path)?)?
        }
        None => Registry::new(registry_config(config)?)?,
    };
    tracing::info!(
        administrator = %registry.administrator(),
        paused = registry.is_paused(),
        domain_types = registry.allowed_domain_types().count(),
        records = registry.record_count(),
        "registry bootstrapped"
    );
    Ok(registry)
}
