//! # Name Records
//!
//! One [`NameRecord`] per fully-qualified name. A record is *active* while
//! its expiry lies strictly in the future; at and after the expiry instant it
//! no longer resolves and the name is open for fresh registration.
//!
//! An expired record is not erased. Its owner remains stored, which is what
//! lets the previous owner renew it (renewal is owner-gated even after
//! expiry) until someone else registers over it.

use lacns_core::{FullyQualifiedName, Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Free-form profile fields attached to a name.
///
/// Opaque to the registry: any strings, empty allowed. A fresh registration
/// always resets all four to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalInfo {
    /// Avatar or picture reference.
    #[serde(default)]
    pub avatar: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// First handle or alias.
    #[serde(default)]
    pub handle: String,
    /// Second handle or alias.
    #[serde(default)]
    pub alias: String,
}

impl PersonalInfo {
    /// Build from the four fields in positional order.
    pub fn new(
        avatar: impl Into<String>,
        email: impl Into<String>,
        handle: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            avatar: avatar.into(),
            email: email.into(),
            handle: handle.into(),
            alias: alias.into(),
        }
    }

    /// Whether all four fields are empty.
    pub fn is_empty(&self) -> bool {
        self.avatar.is_empty()
            && self.email.is_empty()
            && self.handle.is_empty()
            && self.alias.is_empty()
    }
}

/// A registered name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// The fully-qualified key.
    pub name: FullyQualifiedName,
    /// Identity allowed to renew and edit this record.
    pub owner: Identity,
    /// Identity returned by resolution; may differ from the owner.
    pub resolver: Identity,
    /// Profile fields.
    pub personal_info: PersonalInfo,
    /// Instant at which the record stops being active.
    pub expiry: Timestamp,
    /// Value of the registry's registration counter when this record was
    /// (re)registered. Informational only.
    pub registration_order: u64,
}

impl NameRecord {
    /// Whether the record is active at `now` (expiry strictly in the future).
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expiry > now
    }

    /// Whether the record has lapsed at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        !self.is_active(now)
    }

    /// Whether `identity` is the stored owner.
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }

    /// The public resolution view of this record.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            resolver: self.resolver.clone(),
            owner: self.owner.clone(),
            personal_info: self.personal_info.clone(),
        }
    }
}

/// The answer to a resolve query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Identity the name points at.
    pub resolver: Identity,
    /// Identity that controls the record.
    pub owner: Identity,
    /// Profile fields.
    pub personal_info: PersonalInfo,
}
