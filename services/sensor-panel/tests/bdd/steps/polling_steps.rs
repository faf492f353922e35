//! BDD step definitions for polling feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};

use sensor_panel::reading::parse_readings;
use sensor_panel::SensorPanel;

use crate::world::{CannedHttpClient, PanelWorld};

const SOURCE_URL: &str = "http://localhost:8000/sensorData";

fn build_panel(world: &mut PanelWorld, interval: Option<Duration>) {
    let client = Arc::new(CannedHttpClient::new());
    let mut panel = SensorPanel::new(SOURCE_URL, client.clone());
    if let Some(interval) = interval {
        panel = panel.with_poll_interval(interval);
    }
    world.client = Some(client);
    world.panel = Some(panel);
}

async fn load_readings(world: &mut PanelWorld, body: &str) {
    build_panel(world, None);
    world.client().respond_with(body).await;
    world.panel().poll_now().await;
}

#[given("a sensor panel")]
fn sensor_panel(world: &mut PanelWorld) {
    build_panel(world, None);
}

#[given("a sensor panel that has not fetched yet")]
fn sensor_panel_not_fetched(world: &mut PanelWorld) {
    build_panel(world, None);
}

#[given(expr = "a sensor panel with readings {string}")]
async fn sensor_panel_with_readings(world: &mut PanelWorld, body: String) {
    load_readings(world, &body).await;
}

#[given(expr = "a sensor panel with {int} readings counting up from {int}")]
async fn sensor_panel_with_counted_readings(world: &mut PanelWorld, count: u32, start: u32) {
    let body = format!(
        "[{}]",
        (start..start + count)
            .map(|t| format!(r#"{{"temperature":{},"humidity":50}}"#, t))
            .collect::<Vec<_>>()
            .join(",")
    );
    load_readings(world, &body).await;
}

#[given(expr = "a sensor panel polling every {int} milliseconds")]
async fn sensor_panel_polling(world: &mut PanelWorld, millis: u64) {
    build_panel(world, Some(Duration::from_millis(millis)));
    world.client().respond_with("[]").await;
    world.panel_mut().activate();
}

#[given(expr = "the endpoint returns {string}")]
async fn endpoint_returns(world: &mut PanelWorld, body: String) {
    world.client().respond_with(&body).await;
}

#[when("the endpoint becomes unreachable")]
async fn endpoint_becomes_unreachable(world: &mut PanelWorld) {
    world.client().fail("connection refused").await;
}

#[given("the endpoint is unreachable")]
async fn endpoint_unreachable(world: &mut PanelWorld) {
    world.client().fail("connection refused").await;
}

#[when("the poller ticks")]
async fn poller_ticks(world: &mut PanelWorld) {
    world.panel().poll_now().await;
}

#[when(expr = "the panel has polled at least {int} times")]
async fn panel_polled(world: &mut PanelWorld, times: u32) {
    for _ in 0..200 {
        if world.client().call_count() >= times {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "panel polled only {} times, expected at least {}",
        world.client().call_count(),
        times
    );
}

#[when("the panel is torn down")]
async fn panel_torn_down(world: &mut PanelWorld) {
    assert!(world.panel_mut().teardown(), "panel was not active");
    // let an outstanding fetch finish before counting
    tokio::time::sleep(Duration::from_millis(20)).await;
    world.calls_after_teardown = Some(world.client().call_count());
}

#[then(expr = "the panel should hold {int} reading(s)")]
async fn panel_holds(world: &mut PanelWorld, count: usize) {
    assert_eq!(world.panel().readings().await.len(), count);
}

#[then(expr = "the readings should be exactly {string}")]
async fn readings_exactly(world: &mut PanelWorld, body: String) {
    let expected = parse_readings(&body).expect("invalid readings in feature file");
    assert_eq!(world.panel().readings().await, expected);
}

#[then("the panel should no longer be loading")]
async fn not_loading(world: &mut PanelWorld) {
    assert!(!world.state().read().await.loading);
}

#[then("the panel should still be loading")]
async fn still_loading(world: &mut PanelWorld) {
    assert!(world.state().read().await.loading);
}

#[then(expr = "no further fetch should happen within {int} milliseconds")]
async fn no_further_fetch(world: &mut PanelWorld, millis: u64) {
    let before = world
        .calls_after_teardown
        .expect("panel was not torn down");
    tokio::time::sleep(Duration::from_millis(millis)).await;
    assert_eq!(world.client().call_count(), before);
}
