use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::PipelineError;
use crate::table::{DataTable, Value};

/// Load a record table from an uploaded Excel workbook
///
/// This function parses the uploaded bytes as an XLSX workbook and converts
/// the first worksheet into a [`DataTable`]. The first row supplies the
/// column names; every following row becomes a row of values.
///
/// Cell conversion:
/// - numeric cells (int, float, date serial) become `Value::Number`
/// - text and boolean cells become `Value::Text`
/// - empty and error cells become `Value::Missing`
///
/// # Arguments
/// * `bytes` - Raw content of the uploaded workbook
///
/// # Returns
/// * `Result<DataTable, PipelineError>` - The parsed table or an error
///
/// # Errors
/// * `PipelineError::Workbook` if the bytes are not a readable workbook
/// * `PipelineError::NoSheets` if the workbook has no worksheets
/// * `PipelineError::EmptySheet` if the first worksheet has no header row
pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<DataTable, PipelineError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(PipelineError::NoSheets)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(PipelineError::EmptySheet)?;

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Column{}", i + 1),
            other => other.to_string(),
        })
        .collect();

    let mut table = DataTable::new(columns);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }

    log::info!(
        "loaded sheet '{}': {} rows x {} columns",
        sheet_name,
        table.len(),
        table.width()
    );

    Ok(table)
}

fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(b.to_string()),
        // Date serial value; none of the designated numeric columns hold
        // dates, so this only matters for pass-through columns.
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Missing,
    }
}
