//! Web dashboard: the panel page, sort and export actions, and JSON endpoints

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::chart;
use crate::config::{Config, DashboardConfig, ExportConfig};
use crate::export;
use crate::reading::ReadingField;
use crate::render::{build_view, ChartView, PanelView, ReadyView};
use crate::state::StateHandle;
use crate::PanelError;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub state: StateHandle,
    pub dashboard: DashboardConfig,
    pub export: ExportConfig,
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle, config: &Config) -> Router {
    let dashboard_state = DashboardState {
        state,
        dashboard: config.dashboard.clone(),
        export: config.export.clone(),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/sort/{field}", get(sort_handler))
        .route("/export", get(export_handler))
        .route("/api/readings", get(readings_handler))
        .route("/api/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard_state)
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        tracing::error!("Dashboard request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

async fn index_handler(State(dashboard): State<DashboardState>) -> Result<Html<String>, PanelError> {
    let view = {
        let state = dashboard.state.read().await;
        build_view(&state)
    };
    Ok(Html(render_page(&view, &dashboard.dashboard)?))
}

async fn sort_handler(
    State(dashboard): State<DashboardState>,
    Path(field): Path<String>,
) -> Response {
    let field: ReadingField = match field.parse() {
        Ok(field) => field,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };

    let config = dashboard.state.write().await.sort_by(field);
    tracing::debug!("Sorted readings by {} ({})", config.field, config.direction);
    Redirect::to("/").into_response()
}

async fn export_handler(State(dashboard): State<DashboardState>) -> Result<Response, PanelError> {
    let (readings, columns) = {
        let state = dashboard.state.read().await;
        (state.readings.clone(), state.columns.clone())
    };
    let buffer = export::to_xlsx(&readings, &columns, &dashboard.export.sheet_name)?;
    tracing::info!(
        "Exporting {} readings as {}",
        readings.len(),
        dashboard.export.file_name
    );

    let disposition = format!("attachment; filename=\"{}\"", dashboard.export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, export::XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
        .into_response())
}

async fn readings_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    Json(state.readings.clone())
}

async fn status_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    Json(state.status())
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// Render the full panel page for `view`
pub fn render_page(view: &PanelView, config: &DashboardConfig) -> crate::Result<String> {
    let content = match view {
        PanelView::Loading => "<p>Loading...</p>".to_string(),
        PanelView::Ready(ready) => render_ready(ready)?,
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="5">
    <title>{title}</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>{title}</h1>
    <h2>{subtitle}</h2>
    <a href="/export" style="display: inline-block; margin-bottom: 20px; padding: 10px 20px; background-color: #4CAF50; color: white; border-radius: 5px; font-size: 16px; text-decoration: none;">Export to Excel</a>
    {content}
</body>
</html>"#,
        title = html_escape(&config.title),
        subtitle = html_escape(&config.subtitle),
        content = content,
    ))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_ready(view: &ReadyView) -> crate::Result<String> {
    let headers: String = ReadingField::ALL
        .iter()
        .map(|field| {
            format!(
                r#"<th style="padding: 0.5rem; text-align: left;"><a href="/sort/{}">{}</a></th>"#,
                field.name(),
                field.label()
            )
        })
        .collect();

    let rows: String = view
        .table
        .iter()
        .map(|row| {
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                row.temperature, row.pressure, row.humidity
            )
        })
        .collect();

    let charts = view
        .charts
        .iter()
        .map(render_chart)
        .collect::<crate::Result<Vec<_>>>()?
        .join("\n");

    Ok(format!(
        r#"<table style="width: 100%; border-collapse: collapse;">
        <thead>
            <tr style="border-bottom: 2px solid #dee2e6;">{headers}</tr>
        </thead>
        <tbody>{rows}</tbody>
    </table>
    {charts}"#
    ))
}

fn render_chart(view: &ChartView) -> crate::Result<String> {
    let body = match &view.series {
        Some(series) => chart::render_svg(series, view.field.color())?,
        None => format!("<p>{}</p>", view.placeholder()),
    };
    Ok(format!(
        "<section>\n<h2>{}</h2>\n{}\n</section>",
        view.heading(),
        body
    ))
}
