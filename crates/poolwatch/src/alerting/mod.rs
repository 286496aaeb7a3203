//! Webhook alerting for credential pool failures
//!
//! Provides failure classification, per-key throttling, and webhook
//! notification delivery.

mod classifier;
mod dispatcher;
mod format;
mod throttle;

pub use classifier::classify;
pub use dispatcher::{AlertDispatcher, DispatcherConfig};
pub use format::{FormattedMessage, Formatter, FormatterRegistry, CHANNEL_WECOM};
pub use throttle::{ThrottleKey, ThrottleMap};
