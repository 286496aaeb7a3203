//! Webhook destination configuration
//!
//! Loading and persistence belong to the embedding service; this module
//! only defines the configuration shape and how defaults are resolved
//! into normalized destinations.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::AlertEventKind;

/// Channel type applied when a webhook entry leaves `type` empty.
pub const DEFAULT_CHANNEL_TYPE: &str = "wecom";

const DEFAULT_THROTTLE_MINUTES: u64 = 10;

/// Raw webhook entry as it appears in the service configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEntry {
    /// Destination URL, unique within the configured list
    pub url: String,

    /// Channel type tag, defaults to `"wecom"` when empty
    #[serde(default, rename = "type")]
    pub channel_type: String,

    /// Subscribed event tags, defaults to `["account_banned"]` when empty
    #[serde(default)]
    pub events: Vec<String>,

    /// Minimum minutes between alerts per throttle key, defaults to 10
    /// when zero or negative
    #[serde(default)]
    pub throttle_minutes: i64,
}

/// A normalized alert destination with all defaults applied.
///
/// Normalization happens at construction time, not at lookup time, so
/// the dispatch path never re-derives defaults.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Destination URL
    pub url: String,
    /// Channel type tag selecting the formatter
    pub channel_type: String,
    /// Event kinds this destination is subscribed to
    pub events: HashSet<AlertEventKind>,
    /// Minimum interval between alerts for one throttle key
    pub throttle: Duration,
}

impl Destination {
    /// Normalize a raw entry.
    ///
    /// Unknown event tags are skipped with a warning rather than failing
    /// the whole list; an entry whose raw `events` list is empty falls
    /// back to `account_banned` only.
    #[must_use]
    pub fn from_entry(entry: &WebhookEntry) -> Self {
        let channel_type = if entry.channel_type.is_empty() {
            DEFAULT_CHANNEL_TYPE.to_string()
        } else {
            entry.channel_type.clone()
        };

        let mut events = HashSet::new();
        for tag in &entry.events {
            match AlertEventKind::from_tag(tag) {
                Some(kind) => {
                    events.insert(kind);
                }
                None => {
                    warn!(url = %entry.url, tag = %tag, "ignoring unknown webhook event tag");
                }
            }
        }
        if entry.events.is_empty() {
            events.insert(AlertEventKind::AccountBanned);
        }

        let minutes = if entry.throttle_minutes <= 0 {
            DEFAULT_THROTTLE_MINUTES
        } else {
            entry.throttle_minutes.unsigned_abs()
        };

        Self {
            url: entry.url.clone(),
            channel_type,
            events,
            throttle: Duration::from_secs(minutes * 60),
        }
    }

    /// Whether this destination is subscribed to the given event kind.
    #[must_use]
    pub fn subscribes_to(&self, kind: AlertEventKind) -> bool {
        self.events.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_on_empty_fields() {
        let entry = WebhookEntry {
            url: "https://example.com/webhook".to_string(),
            ..WebhookEntry::default()
        };
        let dest = Destination::from_entry(&entry);

        assert_eq!(dest.url, "https://example.com/webhook");
        assert_eq!(dest.channel_type, "wecom");
        assert_eq!(dest.events.len(), 1);
        assert!(dest.subscribes_to(AlertEventKind::AccountBanned));
        assert!(!dest.subscribes_to(AlertEventKind::RateLimited));
        assert_eq!(dest.throttle, Duration::from_secs(600));
    }

    #[test]
    fn explicit_values_preserved() {
        let entry = WebhookEntry {
            url: "https://example.com/webhook".to_string(),
            channel_type: "slack".to_string(),
            events: vec!["rate_limited".to_string()],
            throttle_minutes: 60,
        };
        let dest = Destination::from_entry(&entry);

        assert_eq!(dest.channel_type, "slack");
        assert!(dest.subscribes_to(AlertEventKind::RateLimited));
        assert!(!dest.subscribes_to(AlertEventKind::AccountBanned));
        assert_eq!(dest.throttle, Duration::from_secs(3600));
    }

    #[test]
    fn negative_throttle_falls_back_to_default() {
        let entry = WebhookEntry {
            url: "https://example.com/webhook".to_string(),
            throttle_minutes: -5,
            ..WebhookEntry::default()
        };
        let dest = Destination::from_entry(&entry);
        assert_eq!(dest.throttle, Duration::from_secs(600));
    }

    #[test]
    fn unknown_event_tags_are_skipped() {
        let entry = WebhookEntry {
            url: "https://example.com/webhook".to_string(),
            events: vec!["rate_limited".to_string(), "bogus".to_string()],
            ..WebhookEntry::default()
        };
        let dest = Destination::from_entry(&entry);

        assert_eq!(dest.events.len(), 1);
        assert!(dest.subscribes_to(AlertEventKind::RateLimited));
    }

    #[test]
    fn all_unknown_tags_match_nothing() {
        // A non-empty list of unknown tags must not fall back to the
        // default subscription; the destination simply never matches.
        let entry = WebhookEntry {
            url: "https://example.com/webhook".to_string(),
            events: vec!["bogus".to_string()],
            ..WebhookEntry::default()
        };
        let dest = Destination::from_entry(&entry);
        assert!(dest.events.is_empty());
    }

    #[test]
    fn deserializes_with_serde_defaults() {
        let entry: WebhookEntry =
            serde_json::from_str(r#"{"url": "https://example.com/webhook"}"#).unwrap();

        assert_eq!(entry.url, "https://example.com/webhook");
        assert!(entry.channel_type.is_empty());
        assert!(entry.events.is_empty());
        assert_eq!(entry.throttle_minutes, 0);

        let dest = Destination::from_entry(&entry);
        assert_eq!(dest.channel_type, "wecom");
    }
}
