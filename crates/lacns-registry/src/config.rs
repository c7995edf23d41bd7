//! # Registry Configuration
//!
//! Genesis parameters for a [`Registry`](crate::Registry): the
//! administrator identity, the year length, the initial price table, the
//! initially allowed domain types, and whether registration starts paused.
//!
//! Loaded from YAML (`.yaml`/`.yml`) or JSON (`.json`); any other extension
//! is parsed as YAML, which also accepts JSON.
//!
//! ```yaml
//! administrator: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
//! seconds_per_year: 31536000
//! domain_types: [lac, ripio, num]
//! prices:
//!   three_char: "800000000000000000"
//!   four_char: "600000000000000000"
//!   five_plus_char: "450000000000000000"
//! ```

use std::path::Path;

use lacns_core::{DomainType, Identity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PriceTable;

/// 365 days of 86 400 seconds.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Errors loading or validating configuration and snapshots.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed successfully but violates an invariant.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_seconds_per_year() -> u64 {
    SECONDS_PER_YEAR
}

/// Genesis parameters of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// The single privileged identity.
    pub administrator: Identity,
    /// Length of one registration year, in seconds.
    #[serde(default = "default_seconds_per_year")]
    pub seconds_per_year: u64,
    /// Initial price table.
    #[serde(default)]
    pub prices: PriceTable,
    /// Domain types allowed at genesis.
    #[serde(default)]
    pub domain_types: Vec<DomainType>,
    /// Whether registration starts paused.
    #[serde(default)]
    pub paused: bool,
}

impl RegistryConfig {
    /// Default configuration for the given administrator.
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            seconds_per_year: SECONDS_PER_YEAR,
            prices: PriceTable::default(),
            domain_types: Vec::new(),
            paused: false,
        }
    }

    /// Replace the year length. Test networks use short years.
    pub fn with_seconds_per_year(mut self, seconds_per_year: u64) -> Self {
        self.seconds_per_year = seconds_per_year;
        self
    }

    /// Replace the initial price table.
    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// Add a domain type to the genesis allow-set.
    pub fn with_domain_type(mut self, domain_type: DomainType) -> Self {
        self.domain_types.push(domain_type);
        self
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seconds_per_year == 0 {
            return Err(ConfigError::Invalid(
                "seconds_per_year must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse YAML text and validate.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON text and validate.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}
