//! # Clock Collaborator
//!
//! The registry reads "now" exactly once at the start of each operation.
//! Time only advances between calls.

use std::sync::Arc;

use lacns_core::Timestamp;
use parking_lot::Mutex;

/// Source of the current time, in whole seconds.
pub trait Clock: Send + Sync {
    /// The current instant. Must never go backwards between calls.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A settable clock shared between the registry and whoever drives it.
///
/// Clones share the same instant, so a test can hand one clone to the
/// registry and advance time through another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to `instant`. Moving backwards is ignored.
    pub fn set(&self, instant: Timestamp) {
        let mut now = self.now.lock();
        if instant > *now {
            *now = instant;
        }
    }

    /// Move forward by `secs` seconds and return the new instant.
    ///
    /// Past the last representable instant the clock stays where it is.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let mut now = self.now.lock();
        if let Some(next) = now.checked_add_secs(secs) {
            *now = next;
        }
        *now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_shared() {
        let clock = ManualClock::new(Timestamp::from_epoch_secs(1_000).unwrap());
        let handle = clock.clone();
        handle.advance(60);
        assert_eq!(clock.now().epoch_secs(), 1_060);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(Timestamp::from_epoch_secs(1_000).unwrap());
        clock.set(Timestamp::from_epoch_secs(500).unwrap());
        assert_eq!(clock.now().epoch_secs(), 1_000);
        clock.set(Timestamp::from_epoch_secs(2_000).unwrap());
        assert_eq!(clock.now().epoch_secs(), 2_000);
    }

    #[test]
    fn system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().epoch_secs() > 1_577_836_800);
    }
}
