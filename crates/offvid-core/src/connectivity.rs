//! Online/offline signal with change notification.
//!
//! A `watch` channel carries the current state. It can be pinned (`fixed`,
//! used for `--offline`/`--online` and tests) or driven by a background loop
//! that probes a URL at a fixed interval and publishes only changes.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::fetch;

#[derive(Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    /// Signal pinned to `online` until `set_online` is called.
    pub fn fixed(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Connectivity { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Publish a new state. Returns true if it differed from the previous one
    /// (subscribers are only woken in that case).
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
        changed
    }

    /// Probe `url` once now, then every `interval`, updating the signal.
    ///
    /// Returns the signal after the first probe so callers start with a real
    /// value, plus the handle of the background loop.
    pub async fn spawn_probe(
        url: String,
        interval: Duration,
        timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let first = probe_online(&url, timeout).await;
        let signal = Connectivity::fixed(first);
        let handle = tokio::spawn({
            let signal = signal.clone();
            async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                // First tick completes immediately; the initial probe already ran.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let online = probe_online(&url, timeout).await;
                    signal.set_online(online);
                }
            }
        });
        (signal, handle)
    }
}

/// True when a HEAD request to `url` gets any HTTP response.
pub async fn probe_online(url: &str, timeout: Duration) -> bool {
    let result = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || fetch::probe(&url, timeout)
    })
    .await;
    match result {
        Ok(Ok(code)) => {
            tracing::trace!(url, code, "probe reachable");
            true
        }
        Ok(Err(e)) => {
            tracing::debug!(url, "probe failed: {}", e);
            false
        }
        Err(e) => {
            tracing::warn!("probe task failed: {}", e);
            false
        }
    }
}
