//! SVG line charts for the dashboard

use plotters::prelude::*;

use crate::render::ChartSeries;

pub const CHART_WIDTH: u32 = 720;
pub const CHART_HEIGHT: u32 = 260;

fn render_error<E: std::fmt::Display>(e: E) -> crate::PanelError {
    crate::PanelError::Render(e.to_string())
}

/// Y axis bounds with some headroom; a flat or empty series still gets a usable range
fn y_bounds(series: &ChartSeries) -> (f64, f64) {
    match series.value_range() {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

/// Render `series` as an SVG document
pub fn render_svg(series: &ChartSeries, color: (u8, u8, u8)) -> crate::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let x_max = series.len().max(2) as f64;
        let (y_min, y_max) = y_bounds(series);

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(1f64..x_max, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Reading")
            .y_desc(series.label)
            .draw()
            .map_err(render_error)?;

        let line = RGBColor(color.0, color.1, color.2);
        for segment in series.segments() {
            chart
                .draw_series(segment.iter().map(|&point| Circle::new(point, 2, line.filled())))
                .map_err(render_error)?;
            chart
                .draw_series(LineSeries::new(segment, line.stroke_width(1)))
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}
