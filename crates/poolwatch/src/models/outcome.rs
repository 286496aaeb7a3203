//! Execution outcomes reported by the request executor

use serde::{Deserialize, Serialize};

/// The result of one request attempt against an upstream provider.
///
/// Produced by the external request executor after each attempt and
/// handed to the dispatcher; the alerting pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the attempt succeeded
    pub success: bool,

    /// Credential identifier the attempt was routed through
    pub account_id: String,

    /// Upstream provider name
    pub provider: String,

    /// Model the request targeted
    pub model: String,

    /// HTTP status returned by the provider (0 if no response)
    pub http_status: u16,

    /// Upstream error message, empty on success
    pub error_message: String,
}
