//! Alert dispatch orchestration
//!
//! The dispatcher receives execution outcomes, classifies them, applies
//! per-key throttling, and fires formatted payloads at subscribed
//! destinations as detached sends. Alerting is best-effort: nothing
//! here propagates a failure back into the request path that triggered
//! it, and a slow or hung destination never stalls throttle decisions
//! for unrelated keys.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::classifier::classify;
use super::format::{FormattedMessage, FormatterRegistry};
use super::throttle::{ThrottleKey, ThrottleMap};
use crate::config::{Destination, WebhookEntry};
use crate::models::{AlertEventKind, AlertOccurrence, ExecutionOutcome};

/// Dispatcher tuning knobs.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Timeout applied to each outbound send
    pub send_timeout: Duration,
    /// Maximum number of concurrent outbound sends
    pub max_in_flight: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(10),
            max_in_flight: 32,
        }
    }
}

/// Shared state touched by both dispatch and config reload.
#[derive(Debug, Default)]
struct State {
    destinations: Vec<Destination>,
    throttle: ThrottleMap,
}

/// Dispatches webhook alerts with per-key throttling.
///
/// One instance is constructed by whichever component wires up the
/// request pipeline and shared (via `Arc`) with every caller that
/// produces execution outcomes. The throttle map lives inside the
/// instance, so independent dispatchers (one per test, for example)
/// never interfere with each other.
pub struct AlertDispatcher {
    state: Mutex<State>,
    registry: FormatterRegistry,
    client: Client,
    send_permits: Arc<Semaphore>,
}

impl AlertDispatcher {
    /// Create a dispatcher with the given destinations and default tuning.
    #[must_use]
    pub fn new(entries: &[WebhookEntry]) -> Self {
        Self::with_config(entries, FormatterRegistry::new(), DispatcherConfig::default())
    }

    /// Create a dispatcher with a custom formatter registry and tuning.
    #[must_use]
    pub fn with_config(
        entries: &[WebhookEntry],
        registry: FormatterRegistry,
        config: DispatcherConfig,
    ) -> Self {
        let client = Client::builder()
            .timeout(config.send_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            state: Mutex::new(State {
                destinations: entries.iter().map(Destination::from_entry).collect(),
                throttle: ThrottleMap::new(),
            }),
            registry,
            client,
            send_permits: Arc::new(Semaphore::new(config.max_in_flight)),
        }
    }

    /// Classify an outcome and dispatch alerts if it warrants one.
    ///
    /// This is the entry point the request pipeline calls after every
    /// attempt. It returns nothing and cannot fail from the caller's
    /// perspective. Must be called from within a tokio runtime; sends
    /// are spawned as detached tasks the caller never waits on.
    pub fn handle_outcome(&self, outcome: &ExecutionOutcome) {
        let Some(kind) = classify(outcome) else {
            return;
        };
        self.dispatch(AlertOccurrence::from_outcome(kind, outcome));
    }

    /// Dispatch one occurrence to every subscribed, non-throttled
    /// destination.
    ///
    /// The throttle check-and-record runs under the state mutex, so
    /// concurrent dispatches for the same key within the window result
    /// in exactly one send. The network I/O happens outside the lock.
    pub fn dispatch(&self, occurrence: AlertOccurrence) {
        let now = Instant::now();
        let mut sends: Vec<(String, FormattedMessage)> = Vec::new();

        {
            let mut state = self.state.lock();
            let State {
                destinations,
                throttle,
            } = &mut *state;

            for dest in destinations
                .iter()
                .filter(|d| d.subscribes_to(occurrence.kind))
            {
                let key = ThrottleKey {
                    account_id: occurrence.account_id.clone(),
                    kind: occurrence.kind,
                    url: dest.url.clone(),
                };
                if !throttle.check_and_record(key, dest.throttle, now) {
                    debug!(
                        url = %dest.url,
                        account = %occurrence.account_id,
                        kind = %occurrence.kind,
                        "alert throttled"
                    );
                    continue;
                }

                match self.registry.format(&dest.channel_type, &occurrence) {
                    Ok(message) => sends.push((dest.url.clone(), message)),
                    Err(e) => warn!(
                        url = %dest.url,
                        channel_type = %dest.channel_type,
                        error = %e,
                        "failed to format alert payload"
                    ),
                }
            }
        }

        for (url, message) in sends {
            let client = self.client.clone();
            let permits = Arc::clone(&self.send_permits);
            let kind = occurrence.kind;
            let account_id = occurrence.account_id.clone();

            tokio::spawn(async move {
                // Closed only on drop, which cannot race a live dispatcher.
                let Ok(_permit) = permits.acquire().await else {
                    return;
                };
                send_payload(&client, &url, kind, &account_id, message).await;
            });
        }
    }

    /// Replace the destination list and prune stale throttle entries.
    ///
    /// The swap is atomic: readers observe either the old or the new
    /// list, never a mix. Destinations whose URL survives the reload
    /// keep their throttle timestamps; a reload never resets throttling.
    pub fn replace_destinations(&self, entries: &[WebhookEntry]) {
        let destinations: Vec<Destination> =
            entries.iter().map(Destination::from_entry).collect();

        let mut state = self.state.lock();
        let live_urls: HashSet<&str> = destinations.iter().map(|d| d.url.as_str()).collect();
        state.throttle.prune_absent(&live_urls);
        state.destinations = destinations;
    }

    /// Last recorded send instant for a throttle key, if any.
    #[must_use]
    pub fn last_sent(&self, account_id: &str, kind: AlertEventKind, url: &str) -> Option<Instant> {
        let state = self.state.lock();
        state.throttle.last_sent(&ThrottleKey {
            account_id: account_id.to_string(),
            kind,
            url: url.to_string(),
        })
    }
}

/// POST one payload to a destination; failures are logged and dropped.
///
/// No retry and no backoff. The client carries a fixed timeout after
/// which the attempt is abandoned.
async fn send_payload(
    client: &Client,
    url: &str,
    kind: AlertEventKind,
    account_id: &str,
    message: FormattedMessage,
) {
    let result = client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, message.content_type)
        .body(message.body)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            debug!(url = %url, kind = %kind, account = %account_id, "webhook alert sent");
        }
        Ok(response) => {
            warn!(
                url = %url,
                status = %response.status(),
                "webhook destination returned non-success status"
            );
        }
        Err(e) => {
            warn!(url = %url, error = %e, "webhook POST failed");
        }
    }
}
