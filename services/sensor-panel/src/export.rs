//! Exporter: writes the reading list to an xlsx workbook

use rust_xlsxwriter::{Format, Workbook};

use crate::reading::{Reading, ReadingField};

/// MIME type of the produced workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serialize `readings` into an xlsx buffer with a single sheet named `sheet_name`.
///
/// Row 0 holds the attribute names in `columns` order, followed by one row per
/// reading in the given order. An absent value leaves its cell empty.
pub fn to_xlsx(
    readings: &[Reading],
    columns: &[ReadingField],
    sheet_name: &str,
) -> crate::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, field) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, field.name(), &header)?;
    }

    for (i, reading) in readings.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, field) in columns.iter().enumerate() {
            if let Some(value) = reading.value(*field) {
                worksheet.write_number(row, col as u16, value)?;
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    tracing::debug!(
        "Exported {} readings to sheet '{}' ({} bytes)",
        readings.len(),
        sheet_name,
        buffer.len()
    );
    Ok(buffer)
}
