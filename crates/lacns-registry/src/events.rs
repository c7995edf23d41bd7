//! # Notifications
//!
//! Every successful state change emits one [`Notification`] to the
//! configured [`NotificationSink`], after all of the operation's writes
//! have been applied. Sinks are fire-and-forget: they cannot fail the call.
//!
//! Sinks provided here:
//!
//! - [`EventLog`]: ordered in-memory log, cloneable handle.
//! - [`TracingSink`]: structured `tracing` event per notification.
//! - [`FanOut`]: forwards to several sinks in order.

use std::sync::Arc;

use lacns_core::{FullyQualifiedName, Identity, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::record::PersonalInfo;

/// A state change announced by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A name was registered, either fresh or over an expired record.
    Registration {
        name: FullyQualifiedName,
        owner: Identity,
        resolver: Identity,
        personal_info: PersonalInfo,
        expiry: Timestamp,
        /// Registration counter after the increment.
        counter: u64,
    },
    /// A name's expiry was extended.
    Renewal {
        name: FullyQualifiedName,
        expiry: Timestamp,
    },
    /// A name's resolver was replaced.
    ResolveChanged {
        name: FullyQualifiedName,
        resolver: Identity,
    },
    /// A name's personal-info fields were replaced.
    PersonalInfoChanged {
        name: FullyQualifiedName,
        personal_info: PersonalInfo,
    },
}

impl Notification {
    /// The fully-qualified name the notification is about.
    pub fn name(&self) -> &FullyQualifiedName {
        match self {
            Self::Registration { name, .. }
            | Self::Renewal { name, .. }
            | Self::ResolveChanged { name, .. }
            | Self::PersonalInfoChanged { name, .. } => name,
        }
    }

    /// Short kind label, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Registration { .. } => "registration",
            Self::Renewal { .. } => "renewal",
            Self::ResolveChanged { .. } => "resolve_changed",
            Self::PersonalInfoChanged { .. } => "personal_info_changed",
        }
    }
}

/// Consumer of registry notifications.
pub trait NotificationSink: Send + Sync {
    /// Accept one notification. Called synchronously, in emission order.
    fn publish(&self, notification: &Notification);
}

/// Ordered in-memory notification log.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notification recorded so far.
    pub fn all(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().last().cloned()
    }

    /// Remove and return every recorded notification.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number of recorded notifications.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl NotificationSink for EventLog {
    fn publish(&self, notification: &Notification) {
        self.entries.lock().push(notification.clone());
    }
}

/// Emits each notification as an `info`-level tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&self, notification: &Notification) {
        match notification {
            Notification::Registration {
                name,
                owner,
                resolver,
                expiry,
                counter,
                ..
            } => tracing::info!(
                target: "lacns::notifications",
                %name, %owner, %resolver, %expiry, counter,
                "registration"
            ),
            Notification::Renewal { name, expiry } => tracing::info!(
                target: "lacns::notifications",
                %name, %expiry,
                "renewal"
            ),
            Notification::ResolveChanged { name, resolver } => tracing::info!(
                target: "lacns::notifications",
                %name, %resolver,
                "resolve changed"
            ),
            Notification::PersonalInfoChanged { name, .. } => tracing::info!(
                target: "lacns::notifications",
                %name,
                "personal info changed"
            ),
        }
    }
}

/// Forwards every notification to each inner sink, in order.
#[derive(Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanOut {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink.
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl NotificationSink for FanOut {
    fn publish(&self, notification: &Notification) {
        for sink in &self.sinks {
            sink.publish(notification);
        }
    }
}
