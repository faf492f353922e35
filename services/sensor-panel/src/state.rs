//! Shared panel state: the reading list, loading flag and sort configuration

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::reading::{Reading, ReadingField, Snapshot, SortConfig};
use crate::sort;

/// State shared by the poller and the dashboard
#[derive(Debug, Clone)]
pub struct PanelState {
    pub readings: Vec<Reading>,
    /// Attribute names of the last snapshot, in first-seen order
    pub columns: Vec<ReadingField>,
    pub loading: bool,
    pub sort_config: Option<SortConfig>,
    pub last_success_epoch_ms: Option<u64>,
    pub consecutive_failures: u32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            readings: Vec::new(),
            columns: Vec::new(),
            loading: true,
            sort_config: None,
            last_success_epoch_ms: None,
            consecutive_failures: 0,
        }
    }
}

/// Serializable summary for the status API
#[derive(Debug, Clone, Serialize)]
pub struct PanelStatus {
    pub loading: bool,
    pub reading_count: usize,
    pub sort_config: Option<SortConfig>,
    pub last_success_epoch_ms: Option<u64>,
    pub consecutive_failures: u32,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the reading list with a fetched snapshot
    pub fn apply_snapshot(&mut self, snapshot: impl Into<Snapshot>, now_ms: u64) {
        let snapshot = snapshot.into();
        self.readings = snapshot.readings;
        self.columns = snapshot.columns;
        self.last_success_epoch_ms = Some(now_ms);
        self.consecutive_failures = 0;
        self.loading = false;
    }

    /// Record a failed fetch. The reading list is left untouched.
    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.loading = false;
    }

    /// Sort the reading list by `field`, toggling direction on repeated requests
    pub fn sort_by(&mut self, field: ReadingField) -> SortConfig {
        let direction = sort::resolve_direction(self.sort_config, field);
        let config = SortConfig { field, direction };
        self.readings = sort::sorted_by(&self.readings, config);
        self.sort_config = Some(config);
        config
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus {
            loading: self.loading,
            reading_count: self.readings.len(),
            sort_config: self.sort_config,
            last_success_epoch_ms: self.last_success_epoch_ms,
            consecutive_failures: self.consecutive_failures,
        }
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<PanelState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(PanelState::new()))
}
