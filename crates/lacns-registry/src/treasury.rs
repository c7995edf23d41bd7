//! # Value-Transfer Collaborator
//!
//! Payments reach the registry already in its custody; the registry only
//! keeps the books. Withdrawal is the single outward flow: the registry
//! asks a [`Payout`] to move the whole fee balance to the administrator and
//! zeroes its balance once the transfer has gone through.
//!
//! - [`TracingPayout`]: default; logs each transfer and retains nothing.
//!   Settlement against a real currency ledger belongs to the host.
//! - [`LedgerPayout`]: records every transfer in memory, for inspection.

use std::sync::Arc;

use lacns_core::{Amount, Identity};
use parking_lot::Mutex;

use crate::error::PayoutError;

/// Moves value out of the registry's custody.
pub trait Payout: Send + Sync {
    /// Transfer `amount` to `recipient`. Zero-amount transfers are valid.
    fn transfer(&self, recipient: &Identity, amount: Amount) -> Result<(), PayoutError>;
}

/// A completed outward transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub recipient: Identity,
    pub amount: Amount,
}

/// Logs each transfer as an `info`-level tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPayout;

impl Payout for TracingPayout {
    fn transfer(&self, recipient: &Identity, amount: Amount) -> Result<(), PayoutError> {
        tracing::info!(recipient = %recipient, amount = %amount, "fee balance transferred");
        Ok(())
    }
}

/// Records transfers in memory instead of moving real value.
///
/// Clones share the same ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerPayout {
    transfers: Arc<Mutex<Vec<Transfer>>>,
}

impl LedgerPayout {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transfer made so far, oldest first.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers.lock().clone()
    }

    /// Sum of all transfers to `recipient`.
    pub fn total_to(&self, recipient: &Identity) -> Amount {
        self.transfers
            .lock()
            .iter()
            .filter(|t| &t.recipient == recipient)
            .fold(Amount::ZERO, |acc, t| {
                acc.checked_add(t.amount).unwrap_or(Amount::new(u128::MAX))
            })
    }
}

impl Payout for LedgerPayout {
    fn transfer(&self, recipient: &Identity, amount: Amount) -> Result<(), PayoutError> {
        self.transfers.lock().push(Transfer {
            recipient: recipient.clone(),
            amount,
        });
        Ok(())
    }
}
