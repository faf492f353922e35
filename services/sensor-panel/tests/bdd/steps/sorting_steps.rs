//! BDD step definitions for sorting feature

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cucumber::{then, when};
use tower::ServiceExt;

use sensor_panel::config::Config;
use sensor_panel::dashboard::build_router;
use sensor_panel::{Reading, ReadingField, SortConfig, SortDirection};

use crate::world::PanelWorld;

fn parse_field(s: &str) -> ReadingField {
    s.parse()
        .unwrap_or_else(|_| panic!("Unknown field: {}", s))
}

fn parse_direction(s: &str) -> SortDirection {
    match s {
        "ascending" => SortDirection::Ascending,
        "descending" => SortDirection::Descending,
        other => panic!("Unknown direction: {}", other),
    }
}

fn parse_values(list: &str) -> Vec<Option<f64>> {
    list.split(',')
        .map(str::trim)
        .map(|v| match v {
            "N/A" => None,
            v => Some(v.parse().expect("invalid number in feature file")),
        })
        .collect()
}

#[when(expr = "the {string} header is clicked")]
async fn header_clicked(world: &mut PanelWorld, field: String) {
    if world.readings_before.is_none() {
        world.readings_before = Some(world.panel().readings().await);
    }
    let app = build_router(world.state(), &Config::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/sort/{}", field))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    world.response_status = Some(response.status().as_u16());
}

#[then(expr = "the {word} values should be in order {string}")]
async fn values_in_order(world: &mut PanelWorld, field: String, expected: String) {
    let field = parse_field(&field);
    let actual: Vec<Option<f64>> = world
        .panel()
        .readings()
        .await
        .iter()
        .map(|r| r.value(field))
        .collect();
    assert_eq!(actual, parse_values(&expected));
}

#[then(expr = "the sort should be {string} {string}")]
async fn sort_should_be(world: &mut PanelWorld, field: String, direction: String) {
    let expected = SortConfig {
        field: parse_field(&field),
        direction: parse_direction(&direction),
    };
    assert_eq!(world.state().read().await.sort_config, Some(expected));
}

#[then("the readings should be a permutation of those before sorting")]
async fn readings_permutation(world: &mut PanelWorld) {
    let before = world
        .readings_before
        .clone()
        .expect("no readings captured before sorting");
    let after = world.panel().readings().await;
    assert_eq!(before.len(), after.len());
    let count = |list: &[Reading], r: &Reading| list.iter().filter(|x| *x == r).count();
    for reading in &before {
        assert_eq!(count(&before, reading), count(&after, reading));
    }
}

#[then("the sort request should redirect to the panel")]
fn sort_redirects(world: &mut PanelWorld) {
    assert_eq!(world.response_status, Some(StatusCode::SEE_OTHER.as_u16()));
}

#[then("the sort request should be rejected")]
fn sort_rejected(world: &mut PanelWorld) {
    assert_eq!(world.response_status, Some(StatusCode::NOT_FOUND.as_u16()));
}
