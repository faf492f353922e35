//! Poller: periodically fetches the reading list and replaces the shared snapshot

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::io::HttpClient;
use crate::reading::{parse_snapshot, Snapshot};
use crate::state::StateHandle;

/// Fixed delay between two fetches
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Fetches readings from the source endpoint into the shared state
pub struct Poller {
    url: String,
    interval: Duration,
    http: Arc<dyn HttpClient>,
    state: StateHandle,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("url", &self.url)
            .field("interval", &self.interval)
            .finish()
    }
}

impl Poller {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>, state: StateHandle) -> Self {
        Self {
            url: url.into(),
            interval: POLL_INTERVAL,
            http,
            state,
        }
    }

    /// Override the polling interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    /// Fetch and parse the full reading list once
    pub async fn fetch(&self) -> crate::Result<Snapshot> {
        let response = self.http.get(&self.url).await?;
        if !response.is_success() {
            return Err(crate::PanelError::Http(format!(
                "GET {} returned status {}",
                self.url, response.status
            )));
        }
        parse_snapshot(&response.body)
    }

    /// Fetch once and apply the outcome to the shared state
    pub async fn tick(&self) {
        let result = self.fetch().await;
        self.apply(result).await;
    }

    async fn apply(&self, result: crate::Result<Snapshot>) {
        let mut state = self.state.write().await;
        match result {
            Ok(snapshot) => {
                tracing::debug!(
                    "Fetched {} readings from {}",
                    snapshot.readings.len(),
                    self.url
                );
                state.apply_snapshot(snapshot, current_epoch_ms());
            }
            Err(e) => {
                tracing::warn!("Error fetching sensor data from {}: {}", self.url, e);
                state.record_failure();
            }
        }
    }

    /// Poll immediately, then once per interval, until `cancel` fires.
    ///
    /// A fetch still outstanding when `cancel` fires runs to completion, but
    /// its result is dropped without touching the state.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Polling loop for {} cancelled", self.url);
                    break;
                }
                _ = ticker.tick() => {}
            }

            let result = self.fetch().await;
            if cancel.is_cancelled() {
                tracing::debug!("Discarding fetch result for {} after teardown", self.url);
                break;
            }
            self.apply(result).await;
        }
    }
}

pub(crate) fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
