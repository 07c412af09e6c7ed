use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Parse failures at the workbook level halt the pipeline; unparseable
/// individual cells are recovered as missing values in the normalizer and
/// never reach this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("worksheet has no header row")]
    EmptySheet,

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
