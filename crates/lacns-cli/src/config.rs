//! # Config Subcommand
//!
//! `lacns config check <FILE>` parses a registry configuration (YAML, or
//! JSON by extension) and reports whether it is valid.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use lacns_registry::{Registry, RegistryConfig};
use serde::Serialize;

/// Arguments for the `lacns config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a registry configuration file.
    Check {
        /// Path to the configuration file.
        file: PathBuf,
    },
}

/// Outcome of a configuration check.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfigReport {
    Valid {
        administrator: String,
        seconds_per_year: u64,
        domain_types: Vec<String>,
        paused: bool,
        prices: lacns_registry::PriceTable,
    },
    Invalid {
        error: String,
    },
}

/// Check the configuration at `path`.
///
/// A configuration is valid when it parses, passes validation, and
/// builds a genesis registry.
pub fn check_config(path: &Path) -> ConfigReport {
    let checked = RegistryConfig::load(path).and_then(|config| {
        let report = ConfigReport::Valid {
            administrator: config.administrator.to_string(),
            seconds_per_year: config.seconds_per_year,
            domain_types: config.domain_types.iter().map(ToString::to_string).collect(),
            paused: config.paused,
            prices: config.prices,
        };
        Registry::new(config).map(|_| report)
    });
    match checked {
        Ok(report) => report,
        Err(e) => ConfigReport::Invalid {
            error: e.to_string(),
        },
    }
}

fn describe(report: &ConfigReport) -> String {
    match report {
        ConfigReport::Valid {
            administrator,
            seconds_per_year,
            domain_types,
            paused,
            prices,
        } => format!(
            "config: VALID\n  administrator:    {administrator}\n  seconds_per_year: {seconds_per_year}\n  domain_types:     {}\n  paused:           {paused}\n  prices:           3={} 4={} 5+={}",
            domain_types.join(", "),
            prices.three_char,
            prices.four_char,
            prices.five_plus_char,
        ),
        ConfigReport::Invalid { error } => format!("config: INVALID\n  - {error}"),
    }
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs, json: bool) -> Result<u8> {
    match &args.command {
        ConfigCommand::Check { file } => {
            let report = check_config(file);
            let code = match report {
                ConfigReport::Valid { .. } => 0,
                ConfigReport::Invalid { .. } => 1,
            };
            println!("{}", crate::render(&report, json, describe)?);
            Ok(code)
        }
    }
}
