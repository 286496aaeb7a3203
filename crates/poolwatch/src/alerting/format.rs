//! Channel payload formatting
//!
//! Renders an alert occurrence into the wire payload for a channel
//! type. Formatters live in a lookup table so new channel types can be
//! registered without touching the dispatcher.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{AlertEventKind, AlertOccurrence};

/// Hard cap on the error message embedded in a payload, in characters.
const MAX_ERROR_LEN: usize = 200;

/// Channel type tag of the built-in WeChat Work formatter.
pub const CHANNEL_WECOM: &str = "wecom";

/// Opaque payload ready to POST to a destination.
///
/// Built per (occurrence, destination) pair and never reused.
#[derive(Debug, Clone)]
pub struct FormattedMessage {
    /// Serialized request body
    pub body: Vec<u8>,
    /// Content-Type header value
    pub content_type: &'static str,
}

/// Renders one occurrence into one channel-specific payload.
pub type Formatter = fn(&AlertOccurrence) -> Result<FormattedMessage>;

/// Lookup table from channel type tag to formatter.
#[derive(Debug, Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Formatter>,
}

impl FormatterRegistry {
    /// Registry pre-populated with the built-in `wecom` formatter.
    #[must_use]
    pub fn new() -> Self {
        let mut formatters: HashMap<String, Formatter> = HashMap::new();
        formatters.insert(CHANNEL_WECOM.to_string(), format_wecom_message);
        Self { formatters }
    }

    /// Register a formatter for a channel type, replacing any existing one.
    pub fn register(&mut self, channel_type: impl Into<String>, formatter: Formatter) {
        self.formatters.insert(channel_type.into(), formatter);
    }

    /// Format an occurrence for the given channel type.
    ///
    /// Returns [`Error::UnsupportedChannel`] when no formatter is
    /// registered for the tag; there is no fallback formatting.
    pub fn format(
        &self,
        channel_type: &str,
        occurrence: &AlertOccurrence,
    ) -> Result<FormattedMessage> {
        let formatter = self
            .formatters
            .get(channel_type)
            .ok_or_else(|| Error::unsupported_channel(channel_type))?;
        formatter(occurrence)
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// WeChat Work webhook payload types
#[derive(Debug, Serialize)]
struct WecomPayload {
    msgtype: &'static str,
    markdown: WecomMarkdown,
}

#[derive(Debug, Serialize)]
struct WecomMarkdown {
    content: String,
}

/// Builds the WeChat Work markdown webhook payload.
pub fn format_wecom_message(occurrence: &AlertOccurrence) -> Result<FormattedMessage> {
    let title = match occurrence.kind {
        AlertEventKind::AccountBanned => r#"<font color="warning">Account Banned</font>"#,
        AlertEventKind::RateLimited => r#"<font color="comment">Rate Limited</font>"#,
    };

    let account = strip_account_id(&occurrence.account_id);
    let error = truncate_error(&occurrence.error_message);

    let content = format!(
        "## {}\n> Account: {}\n> Provider: {}\n> Model: {}\n> HTTP Status: {}\n> Error: {}\n> Time: {}",
        title,
        account,
        occurrence.provider,
        occurrence.model,
        occurrence.http_status,
        error,
        occurrence.timestamp.format("%Y-%m-%d %H:%M:%S %Z"),
    );

    let payload = WecomPayload {
        msgtype: "markdown",
        markdown: WecomMarkdown { content },
    };

    Ok(FormattedMessage {
        body: serde_json::to_vec(&payload)?,
        content_type: "application/json",
    })
}

/// Strips any path prefix and a trailing `.json` suffix for readability.
fn strip_account_id(account_id: &str) -> String {
    let base = Path::new(account_id)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(account_id);
    base.strip_suffix(".json").unwrap_or(base).to_string()
}

/// Caps the error message at [`MAX_ERROR_LEN`] characters, appending a
/// truncation marker when the cap is exceeded.
fn truncate_error(msg: &str) -> String {
    if msg.chars().count() <= MAX_ERROR_LEN {
        return msg.to_string();
    }
    let truncated: String = msg.chars().take(MAX_ERROR_LEN).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn occurrence(kind: AlertEventKind, account_id: &str, error_message: &str) -> AlertOccurrence {
        AlertOccurrence {
            kind,
            account_id: account_id.to_string(),
            provider: "antigravity".to_string(),
            model: "gemini-2.5-pro".to_string(),
            http_status: 403,
            error_message: error_message.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 10, 30, 0).unwrap(),
        }
    }

    fn content_of(message: &FormattedMessage) -> String {
        let value: serde_json::Value = serde_json::from_slice(&message.body).unwrap();
        assert_eq!(value["msgtype"], "markdown");
        value["markdown"]["content"].as_str().unwrap().to_string()
    }

    #[test]
    fn wecom_payload_contains_all_fields() {
        let occ = occurrence(
            AlertEventKind::AccountBanned,
            "/home/user/.pool/user@gmail.com.json",
            "This service has been disabled",
        );
        let message = format_wecom_message(&occ).unwrap();
        assert_eq!(message.content_type, "application/json");

        let content = content_of(&message);
        assert!(content.contains("Account Banned"));
        assert!(content.contains("Account: user@gmail.com\n"));
        assert!(content.contains("antigravity"));
        assert!(content.contains("gemini-2.5-pro"));
        assert!(content.contains("HTTP Status: 403"));
        assert!(content.contains("2026-02-14 10:30:00 UTC"));
    }

    #[test]
    fn rate_limited_renders_informational_title() {
        let occ = occurrence(AlertEventKind::RateLimited, "test.json", "quota exceeded");
        let content = content_of(&format_wecom_message(&occ).unwrap());
        assert!(content.contains(r#"<font color="comment">Rate Limited</font>"#));
    }

    #[test]
    fn long_error_truncated_with_marker() {
        let long = "x".repeat(300);
        let occ = occurrence(AlertEventKind::RateLimited, "test.json", &long);
        let content = content_of(&format_wecom_message(&occ).unwrap());

        let expected = format!("{}...", "x".repeat(200));
        assert!(content.contains(&expected));
        assert!(!content.contains(&"x".repeat(201)));
    }

    #[test]
    fn short_error_passes_through() {
        let short = "y".repeat(50);
        assert_eq!(truncate_error(&short), short);
    }

    #[test]
    fn truncation_is_char_boundary_safe() {
        let multibyte = "配".repeat(250);
        let truncated = truncate_error(&multibyte);
        assert_eq!(truncated.chars().count(), MAX_ERROR_LEN + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn account_id_stripping() {
        assert_eq!(
            strip_account_id("/home/user/.pool/user@gmail.com.json"),
            "user@gmail.com"
        );
        assert_eq!(strip_account_id("nested/dir/cred.json"), "cred");
        assert_eq!(strip_account_id("plain-account"), "plain-account");
    }

    #[test]
    fn unknown_channel_type_errors() {
        let registry = FormatterRegistry::new();
        let occ = occurrence(AlertEventKind::AccountBanned, "test.json", "banned");
        let err = registry.format("pagerduty", &occ).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChannel { channel_type } if channel_type == "pagerduty"));
    }

    #[test]
    fn registered_formatter_is_used() {
        fn plain(occ: &AlertOccurrence) -> crate::error::Result<FormattedMessage> {
            Ok(FormattedMessage {
                body: format!("{}: {}", occ.kind, occ.account_id).into_bytes(),
                content_type: "text/plain",
            })
        }

        let mut registry = FormatterRegistry::new();
        registry.register("plain", plain);

        let occ = occurrence(AlertEventKind::RateLimited, "test.json", "quota");
        let message = registry.format("plain", &occ).unwrap();
        assert_eq!(message.content_type, "text/plain");
        assert_eq!(message.body, b"rate_limited: test.json".to_vec());
    }
}
