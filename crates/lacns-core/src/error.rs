//! # Validation Errors
//!
//! Errors raised when a primitive is constructed from untrusted input.
//! Each variant names the offending value so callers can echo it back.

use thiserror::Error;

/// Rejection of a malformed primitive value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The identity string is empty, too long, or contains whitespace.
    #[error("invalid identity {value:?}: {reason}")]
    InvalidIdentity {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The base name is empty, too long, or contains forbidden characters.
    #[error("invalid name {value:?}: {reason}")]
    InvalidLabel {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The domain type suffix is empty, too long, or contains forbidden characters.
    #[error("invalid domain type {value:?}: {reason}")]
    InvalidDomainType {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A fully-qualified name lacks the `name.domain` shape.
    #[error("invalid fully-qualified name {value:?}: expected <name>.<domain type>")]
    InvalidFullyQualifiedName {
        /// The rejected input.
        value: String,
    },

    /// An amount string is not a non-negative integer.
    #[error("invalid amount {value:?}: expected a non-negative integer in smallest units")]
    InvalidAmount {
        /// The rejected input.
        value: String,
    },

    /// A Unix timestamp falls outside the representable range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}
