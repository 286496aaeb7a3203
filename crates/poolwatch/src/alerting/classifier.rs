//! Outcome classification

use crate::models::{AlertEventKind, ExecutionOutcome};

/// Lowercase substrings that mark a 403 response as an account ban.
///
/// These match free-text wording from upstream providers and are not a
/// stable contract; the list is a candidate for externalization into
/// configuration.
const BAN_KEYWORDS: &[&str] = &["disabled", "violation", "suspended", "banned", "terminated"];

/// Maps an execution outcome to the alert event it warrants, if any.
///
/// Pure and cheap; meant to be called on every outcome, the overwhelming
/// majority of which return `None`. Generic 403s without a ban keyword
/// deliberately do not alert to avoid false positives on ordinary
/// permission errors.
#[must_use]
pub fn classify(outcome: &ExecutionOutcome) -> Option<AlertEventKind> {
    if outcome.success {
        return None;
    }
    if outcome.http_status == 403 && is_account_banned(&outcome.error_message) {
        return Some(AlertEventKind::AccountBanned);
    }
    if outcome.http_status == 429 {
        return Some(AlertEventKind::RateLimited);
    }
    None
}

fn is_account_banned(msg: &str) -> bool {
    if msg.is_empty() {
        return false;
    }
    let lower = msg.to_lowercase();
    BAN_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
