//! Sort controller: direction toggling and field ordering

use std::cmp::Ordering;

use crate::reading::{Reading, ReadingField, SortConfig, SortDirection};

/// Resolve the direction for a sort request on `field`.
///
/// Only `(field, Ascending)` flips to descending; any other prior state
/// (no sort, another field, or already descending) starts ascending again.
pub fn resolve_direction(current: Option<SortConfig>, field: ReadingField) -> SortDirection {
    match current {
        Some(SortConfig {
            field: current_field,
            direction: SortDirection::Ascending,
        }) if current_field == field => SortDirection::Descending,
        _ => SortDirection::Ascending,
    }
}

/// Ascending order of two field values. Absent values sort after every present one.
pub fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Return a freshly ordered copy of `readings`. The sort is stable.
pub fn sorted_by(readings: &[Reading], config: SortConfig) -> Vec<Reading> {
    let mut sorted = readings.to_vec();
    let field = config.field;
    match config.direction {
        SortDirection::Ascending => {
            sorted.sort_by(|a, b| compare_values(a.value(field), b.value(field)))
        }
        SortDirection::Descending => {
            sorted.sort_by(|a, b| compare_values(b.value(field), a.value(field)))
        }
    }
    sorted
}
