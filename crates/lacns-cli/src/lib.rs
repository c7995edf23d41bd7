//! # lacns-cli: Name Service Command-Line Interface
//!
//! Offline tooling around the registry. Nothing here talks to a running
//! server; every command works from files and the registry crate alone.
//!
//! ## Subcommands
//!
//! - `quote`: Required payment for a name and duration
//! - `config check`: Parse and validate a registry configuration file
//! - `snapshot resolve`: Resolve a name against a saved snapshot
//! - `snapshot summary`: Counters and configuration of a saved snapshot
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers return an exit code: `0` success, `1` a negative answer
//!   (invalid file, unresolvable name), `2` an error such as unreadable input.

pub mod config;
pub mod quote;
pub mod snapshot;

use serde::Serialize;

/// Render `value` as pretty JSON, or fall back to `text` for plain output.
pub(crate) fn render<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T) -> String) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}
