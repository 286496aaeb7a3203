//! # Poolwatch
//!
//! Webhook alerting for multi-account credential pools.
//!
//! Poolwatch inspects the outcome of every request routed through a pool
//! of upstream credentials and notifies operators when a failure indicates
//! that an account has been banned or is being rate-limited. Alerting is
//! strictly best-effort: nothing in this crate can fail back into the
//! request path that triggered it.
//!
//! ## Architecture
//!
//! - **Classifier**: maps an execution outcome to an alert event kind
//! - **Formatter registry**: renders an occurrence into a channel payload
//! - **Throttle map**: one timer per (account, event, destination URL)
//! - **Dispatcher**: orchestrates classify → throttle → format → send
//!
//! ## Quick Start
//!
//! ```rust
//! use poolwatch::{AlertDispatcher, WebhookEntry};
//!
//! let entries = vec![WebhookEntry {
//!     url: "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=...".to_string(),
//!     channel_type: String::new(),
//!     events: vec!["account_banned".to_string()],
//!     throttle_minutes: 60,
//! }];
//!
//! let dispatcher = AlertDispatcher::new(&entries);
//! // Hand the dispatcher to the request pipeline and call
//! // `dispatcher.handle_outcome(&outcome)` after each attempt.
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod config;
pub mod error;
pub mod models;

pub use alerting::{classify, AlertDispatcher, DispatcherConfig, FormatterRegistry};
pub use config::{Destination, WebhookEntry};
pub use error::{Error, Result};
pub use models::{AlertEventKind, AlertOccurrence, ExecutionOutcome};
