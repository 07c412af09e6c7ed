use std::io::{Error as IoError, ErrorKind};

use crate::error::PipelineError;
use crate::views::ManagerRow;

/// Download name offered to the browser for the top-managers export.
pub const CSV_FILENAME: &str = "top_managers.csv";

/// Header row of the export, in column order.
pub const CSV_HEADERS: [&str; 6] = [
    "BU",
    "Manager",
    "FY25 Attainment",
    "Tenure (Years)",
    "Team Size",
    "Performance per Tenure",
];

/// Serialize the top-managers view to CSV
///
/// Produces UTF-8 CSV bytes with a header row and no index column. Undefined
/// ratios and means appear as empty fields, mirroring how the charts render
/// them as blanks.
///
/// # Arguments
/// * `rows` - Rows of the top-managers view, already sorted and truncated
///
/// # Returns
/// * `Result<Vec<u8>, PipelineError>` - CSV content as bytes or an error
///
/// # Examples
/// ```
/// use sales_analyzer::downloader::top_managers_csv;
///
/// let csv = top_managers_csv(&[]).unwrap();
/// let text = String::from_utf8(csv).unwrap();
/// assert!(text.starts_with("BU,Manager,FY25 Attainment"));
/// ```
pub fn top_managers_csv(rows: &[ManagerRow]) -> Result<Vec<u8>, PipelineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // Header written explicitly so an empty view still downloads with one.
    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        writer.write_record([
            row.bu.as_str(),
            row.manager.as_str(),
            &format_cell(row.attainment),
            &format_cell(row.tenure),
            &row.team_size.to_string(),
            &format_cell(row.performance_per_tenure),
        ])?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(IoError::new(ErrorKind::Other, e.to_string())))
}

fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
