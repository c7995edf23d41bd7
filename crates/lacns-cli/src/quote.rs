//! # Quote Subcommand
//!
//! `lacns quote <name> [--years N] [--config FILE]`
//!
//! Prints what a non-administrator must attach to register or renew
//! `name` for `years`. Prices come from the configuration file when one
//! is given, otherwise from the default table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lacns_core::{Amount, FullyQualifiedName, Label};
use lacns_registry::{PriceTable, PriceTier, RegistryConfig, RegistryError};
use serde::Serialize;

/// Arguments for the `lacns quote` subcommand.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Base name ("fer") or fully-qualified name ("fer.lac").
    pub name: String,

    /// Number of years.
    #[arg(long, default_value_t = 1)]
    pub years: u64,

    /// Registry configuration file supplying the price table.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A computed quote.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Quote {
    pub label: String,
    pub tier: PriceTier,
    pub years: u64,
    pub price_per_year: Amount,
    pub price: Amount,
}

/// Parse either form of name into the label that is priced.
fn priced_label(name: &str) -> Result<Label> {
    if name.contains('.') {
        let fqn: FullyQualifiedName = name.parse()?;
        Ok(fqn.label().clone())
    } else {
        Ok(Label::new(name)?)
    }
}

/// Compute the quote described by `args`.
pub fn compute_quote(args: &QuoteArgs) -> Result<Quote> {
    let prices = match &args.config {
        Some(path) => RegistryConfig::load(path)?.prices,
        None => PriceTable::default(),
    };
    let label = priced_label(&args.name)?;
    if args.years < 1 {
        return Err(RegistryError::InvalidDuration.into());
    }
    let price = prices
        .required_payment(&label, args.years)
        .context("price overflows the amount range")?;
    Ok(Quote {
        tier: PriceTier::for_length(label.char_len()),
        price_per_year: prices.price_per_year(&label),
        label: label.to_string(),
        years: args.years,
        price,
    })
}

/// Execute the quote subcommand.
pub fn run_quote(args: &QuoteArgs, json: bool) -> Result<u8> {
    let quote = compute_quote(args)?;
    let out = crate::render(&quote, json, |q| {
        format!(
            "{}: {} x {} year(s) = {} ({})",
            q.label, q.price_per_year, q.years, q.price, q.tier
        )
    })?;
    println!("{out}");
    Ok(0)
}
