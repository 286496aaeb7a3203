//! Per-key alert throttling

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::models::AlertEventKind;

/// Uniquely addresses one throttle timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    /// Credential identifier
    pub account_id: String,
    /// Event kind
    pub kind: AlertEventKind,
    /// Destination URL
    pub url: String,
}

/// Last-send bookkeeping per throttle key.
///
/// The map itself is not synchronized; the dispatcher holds it behind
/// its mutex so check-and-record is atomic across concurrent callers.
#[derive(Debug, Default)]
pub struct ThrottleMap {
    last_sent: HashMap<ThrottleKey, Instant>,
}

impl ThrottleMap {
    /// Create an empty throttle map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` and return true if the key is outside its window.
    ///
    /// A send is permitted when no prior send exists for the key or the
    /// elapsed time since the last send is at least `window`. A denied
    /// check leaves the recorded timestamp untouched.
    pub fn check_and_record(&mut self, key: ThrottleKey, window: Duration, now: Instant) -> bool {
        match self.last_sent.get(&key) {
            Some(last) if now.duration_since(*last) < window => false,
            _ => {
                self.last_sent.insert(key, now);
                true
            }
        }
    }

    /// Drop entries whose destination URL is no longer configured.
    pub fn prune_absent(&mut self, live_urls: &HashSet<&str>) {
        self.last_sent
            .retain(|key, _| live_urls.contains(key.url.as_str()));
    }

    /// Last recorded send instant for a key, if any.
    #[must_use]
    pub fn last_sent(&self, key: &ThrottleKey) -> Option<Instant> {
        self.last_sent.get(key).copied()
    }
}
