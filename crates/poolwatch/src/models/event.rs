//! Alert event kinds and occurrences

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExecutionOutcome;

/// Kind of actionable event derived from a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertEventKind {
    /// The upstream provider indicates the account has been banned
    AccountBanned,
    /// The upstream provider is rate-limiting the account
    RateLimited,
}

impl AlertEventKind {
    /// Wire tag used in configuration `events` lists.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountBanned => "account_banned",
            Self::RateLimited => "rate_limited",
        }
    }

    /// Parse a configuration tag. Returns `None` for unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "account_banned" => Some(Self::AccountBanned),
            "rate_limited" => Some(Self::RateLimited),
            _ => None,
        }
    }
}

impl fmt::Display for AlertEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified failure, ready to be formatted and sent.
///
/// Transient: built per dispatch attempt and formatted independently
/// for each destination, never cached across occurrences.
#[derive(Debug, Clone)]
pub struct AlertOccurrence {
    /// The event kind the failure was classified as
    pub kind: AlertEventKind,
    /// Credential identifier the failing request was routed through
    pub account_id: String,
    /// Upstream provider name
    pub provider: String,
    /// Model the request targeted
    pub model: String,
    /// HTTP status of the failed attempt
    pub http_status: u16,
    /// Upstream error message
    pub error_message: String,
    /// When the failure was observed
    pub timestamp: DateTime<Utc>,
}

impl AlertOccurrence {
    /// Build an occurrence from a classified outcome, stamped with the
    /// current time.
    #[must_use]
    pub fn from_outcome(kind: AlertEventKind, outcome: &ExecutionOutcome) -> Self {
        Self {
            kind,
            account_id: outcome.account_id.clone(),
            provider: outcome.provider.clone(),
            model: outcome.model.clone(),
            http_status: outcome.http_status,
            error_message: outcome.error_message.clone(),
            timestamp: Utc::now(),
        }
    }
}
