//! Renderer: view model of the panel derived from the shared state

use crate::reading::{Reading, ReadingField};
use crate::state::PanelState;

/// Number of most recent readings shown in the table
pub const TABLE_ROWS: usize = 5;

/// Table cell text for an absent value
pub const NOT_AVAILABLE: &str = "N/A";

/// What the panel shows for a given state
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Loading,
    Ready(ReadyView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub table: Vec<TableRow>,
    pub charts: Vec<ChartView>,
}

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub temperature: String,
    pub pressure: String,
    pub humidity: String,
}

impl TableRow {
    fn from_reading(reading: &Reading) -> Self {
        Self {
            temperature: format_value(Some(reading.temperature)),
            pressure: format_value(reading.pressure),
            humidity: format_value(Some(reading.humidity)),
        }
    }
}

/// A chart over the whole reading list, or a placeholder when there is nothing to plot
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub field: ReadingField,
    pub series: Option<ChartSeries>,
}

impl ChartView {
    pub fn heading(&self) -> String {
        format!("{} Chart", self.field.title())
    }

    pub fn placeholder(&self) -> String {
        format!("No data available for {}.", self.field.title())
    }
}

/// One labelled series; x is the 1-based position in the current order
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub points: Vec<(usize, Option<f64>)>,
}

impl ChartSeries {
    fn for_field(readings: &[Reading], field: ReadingField) -> Self {
        Self {
            label: field.label(),
            points: readings
                .iter()
                .enumerate()
                .map(|(i, r)| (i + 1, r.value(field)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Runs of consecutive present values; an absent value breaks the line
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(x, y) in &self.points {
            match y {
                Some(y) => current.push((x as f64, y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Smallest and largest present value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|&(_, y)| y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

/// Format a value with two decimals, or the not-available marker.
///
/// A value exactly halfway between two hundredths rounds away from zero.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", away_from_zero_on_tie(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `{:.2}` rounds exact ties to even. A binary float lies exactly halfway
/// between two hundredths only when it is an odd multiple of 1/8, so step
/// those one ulp outward and leave everything else alone.
fn away_from_zero_on_tie(v: f64) -> f64 {
    let eighths = v * 8.0;
    let tie = eighths.fract() == 0.0 && eighths % 2.0 != 0.0;
    match (tie, v > 0.0) {
        (true, true) => v.next_up(),
        (true, false) => v.next_down(),
        (false, _) => v,
    }
}

/// Build the view for the current state
pub fn build_view(state: &PanelState) -> PanelView {
    if state.loading {
        return PanelView::Loading;
    }

    let readings = &state.readings;
    let start = readings.len().saturating_sub(TABLE_ROWS);
    let table = readings[start..].iter().map(TableRow::from_reading).collect();

    let charts = ReadingField::ALL
        .into_iter()
        .map(|field| {
            let plottable = match field {
                ReadingField::Pressure => readings.iter().any(|r| r.pressure.is_some()),
                _ => true,
            };
            ChartView {
                field,
                series: plottable.then(|| ChartSeries::for_field(readings, field)),
            }
        })
        .collect();

    PanelView::Ready(ReadyView { table, charts })
}
