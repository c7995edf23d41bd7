//! # Tiered Pricing
//!
//! The yearly price of a name depends only on the character length of its
//! base label:
//!
//! ```text
//! length 3   ──▶ three_char
//! length 4   ──▶ four_char
//! length 5+  ──▶ five_plus_char
//! length 1-2 ──▶ five_plus_char   (no dedicated tier)
//! ```
//!
//! The table is replaced wholesale by the administrator; individual tiers
//! are never edited in isolation.

use lacns_core::{Amount, Label};
use serde::{Deserialize, Serialize};

/// Default yearly price for 3-character names (0.8 of the native token).
pub const DEFAULT_THREE_CHAR_PRICE: Amount = Amount::new(800_000_000_000_000_000);

/// Default yearly price for 4-character names (0.6 of the native token).
pub const DEFAULT_FOUR_CHAR_PRICE: Amount = Amount::new(600_000_000_000_000_000);

/// Default yearly price for names of 5 or more characters (0.45 of the native token).
pub const DEFAULT_FIVE_PLUS_CHAR_PRICE: Amount = Amount::new(450_000_000_000_000_000);

/// The price tier a label falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    /// Exactly three characters.
    ThreeChar,
    /// Exactly four characters.
    FourChar,
    /// Every other length, including 1 and 2.
    FivePlusChar,
}

impl PriceTier {
    /// Select the tier for a character length.
    pub fn for_length(char_len: usize) -> Self {
        match char_len {
            3 => Self::ThreeChar,
            4 => Self::FourChar,
            _ => Self::FivePlusChar,
        }
    }

    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeChar => "three_char",
            Self::FourChar => "four_char",
            Self::FivePlusChar => "five_plus_char",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yearly registration price per length tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceTable {
    /// Price per year for 3-character names.
    pub three_char: Amount,
    /// Price per year for 4-character names.
    pub four_char: Amount,
    /// Price per year for names of 5 or more characters.
    pub five_plus_char: Amount,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            three_char: DEFAULT_THREE_CHAR_PRICE,
            four_char: DEFAULT_FOUR_CHAR_PRICE,
            five_plus_char: DEFAULT_FIVE_PLUS_CHAR_PRICE,
        }
    }
}

impl PriceTable {
    /// Build a table from the three tier prices.
    pub fn new(three_char: Amount, four_char: Amount, five_plus_char: Amount) -> Self {
        Self {
            three_char,
            four_char,
            five_plus_char,
        }
    }

    /// Yearly price of a tier.
    pub fn tier_price(&self, tier: PriceTier) -> Amount {
        match tier {
            PriceTier::ThreeChar => self.three_char,
            PriceTier::FourChar => self.four_char,
            PriceTier::FivePlusChar => self.five_plus_char,
        }
    }

    /// Yearly price of a label.
    pub fn price_per_year(&self, label: &Label) -> Amount {
        self.tier_price(PriceTier::for_length(label.char_len()))
    }

    /// Price of holding `label` for `years` years, or `None` on overflow.
    pub fn required_payment(&self, label: &Label, years: u64) -> Option<Amount> {
        self.price_per_year(label).checked_mul(years)
    }
}
