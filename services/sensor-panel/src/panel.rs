//! Panel lifecycle: owns the state and the polling task

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::io::HttpClient;
use crate::poller::Poller;
use crate::reading::{Reading, ReadingField, SortConfig};
use crate::render::{build_view, PanelView};
use crate::state::{new_state_handle, StateHandle};

/// Longest time [`SensorPanel::shutdown`] waits for an outstanding fetch
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

struct ActivePoll {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// A sensor panel bound to one source endpoint.
///
/// Polling starts with [`SensorPanel::activate`] and stops on
/// [`SensorPanel::teardown`] or when the panel is dropped.
pub struct SensorPanel {
    state: StateHandle,
    poller: Arc<Poller>,
    active: Option<ActivePoll>,
}

impl std::fmt::Debug for SensorPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorPanel")
            .field("poller", &self.poller)
            .field("active", &self.active.is_some())
            .finish()
    }
}

impl SensorPanel {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let state = new_state_handle();
        let poller = Poller::new(url, http, Arc::clone(&state));
        Self {
            state,
            poller: Arc::new(poller),
            active: None,
        }
    }

    /// Replace the polling interval. Takes effect on the next activation.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        let poller = Poller::new(
            self.poller.url(),
            Arc::clone(self.poller.http()),
            Arc::clone(&self.state),
        )
        .with_interval(interval);
        self.poller = Arc::new(poller);
        self
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start polling on the current tokio runtime. Activating twice is a no-op.
    pub fn activate(&mut self) {
        if self.active.is_some() {
            return;
        }
        let cancel = CancellationToken::new();
        let poller = Arc::clone(&self.poller);
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move { poller.run(task_cancel).await });
        tracing::info!("Polling {} every {:?}", self.poller.url(), self.poller.interval());
        self.active = Some(ActivePoll { cancel, handle });
    }

    /// Stop polling. Returns `false` if the panel was not active.
    ///
    /// An outstanding fetch is left to finish on its own; its result is discarded.
    pub fn teardown(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.cancel.cancel();
                tracing::info!("Stopped polling {}", self.poller.url());
                true
            }
            None => false,
        }
    }

    /// Stop polling and wait up to [`SHUTDOWN_GRACE`] for the polling task to exit.
    ///
    /// A task still stuck in a fetch after that is detached.
    pub async fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            match tokio::time::timeout(SHUTDOWN_GRACE, active.handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!("Polling task for {} ended abnormally: {}", self.poller.url(), e)
                }
                Err(_) => tracing::warn!(
                    "Fetch from {} still outstanding after {:?}, detaching",
                    self.poller.url(),
                    SHUTDOWN_GRACE
                ),
            }
            tracing::info!("Stopped polling {}", self.poller.url());
        }
    }

    /// Run one fetch outside the timer
    pub async fn poll_now(&self) {
        self.poller.tick().await;
    }

    pub async fn sort(&self, field: ReadingField) -> SortConfig {
        self.state.write().await.sort_by(field)
    }

    pub async fn view(&self) -> PanelView {
        build_view(&*self.state.read().await)
    }

    pub async fn readings(&self) -> Vec<Reading> {
        self.state.read().await.readings.clone()
    }

    pub async fn export(&self, sheet_name: &str) -> crate::Result<Vec<u8>> {
        let state = self.state.read().await;
        crate::export::to_xlsx(&state.readings, &state.columns, sheet_name)
    }
}

impl Drop for SensorPanel {
    fn drop(&mut self) {
        self.teardown();
    }
}
