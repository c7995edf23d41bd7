//! # Caller Identity
//!
//! The registry never authenticates anyone. The hosting environment hands
//! it an already-authenticated [`Identity`], and the registry only compares
//! identities for equality: against a record's stored owner, or against the
//! distinguished administrator.
//!
//! Identities are opaque strings (typically a hex account address). They
//! are compared byte-for-byte; no case folding is applied, so callers must
//! present addresses in one canonical spelling.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted identity length in bytes.
pub const MAX_IDENTITY_LEN: usize = 128;

/// An authenticated caller, record owner, or resolution target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap an identity string.
    ///
    /// # Errors
    ///
    /// Rejects empty strings, strings longer than [`MAX_IDENTITY_LEN`],
    /// and strings containing whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.len() > MAX_IDENTITY_LEN {
            Some("exceeds 128 bytes")
        } else if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("must not contain whitespace or control characters")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ValidationError::InvalidIdentity { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
