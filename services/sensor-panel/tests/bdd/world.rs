//! BDD test world for the sensor panel service

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cucumber::World;
use tokio::sync::RwLock;

use sensor_panel::io::{HttpClient, HttpResponse};
use sensor_panel::state::StateHandle;
use sensor_panel::{PanelError, Reading, SensorPanel};

/// An HTTP client that serves a swappable canned response and counts requests
#[derive(Debug)]
pub struct CannedHttpClient {
    pub response: RwLock<Result<HttpResponse, String>>,
    pub calls: AtomicU32,
}

impl CannedHttpClient {
    pub fn new() -> Self {
        Self {
            response: RwLock::new(Err("no response configured".to_string())),
            calls: AtomicU32::new(0),
        }
    }

    pub async fn respond_with(&self, body: &str) {
        *self.response.write().await = Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        });
    }

    pub async fn fail(&self, reason: &str) {
        *self.response.write().await = Err(reason.to_string());
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpClient for CannedHttpClient {
    async fn get(&self, _url: &str) -> sensor_panel::Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.read().await.clone().map_err(PanelError::Http)
    }
}

#[derive(Debug, Default, World)]
pub struct PanelWorld {
    pub client: Option<Arc<CannedHttpClient>>,
    pub panel: Option<SensorPanel>,

    // Captured before an action for later comparison
    pub readings_before: Option<Vec<Reading>>,
    pub calls_after_teardown: Option<u32>,

    // Dashboard responses
    pub page: Option<String>,
    pub response_status: Option<u16>,
    pub download_name: Option<String>,
    pub download: Option<Vec<u8>>,
}

impl PanelWorld {
    pub fn panel(&self) -> &SensorPanel {
        self.panel.as_ref().expect("panel not set")
    }

    pub fn panel_mut(&mut self) -> &mut SensorPanel {
        self.panel.as_mut().expect("panel not set")
    }

    pub fn state(&self) -> StateHandle {
        Arc::clone(self.panel().state())
    }

    pub fn client(&self) -> &Arc<CannedHttpClient> {
        self.client.as_ref().expect("client not set")
    }
}
