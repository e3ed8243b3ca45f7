use thiserror::Error;

/// Convenience result type for the data pipeline.
pub type SweepResult<T> = Result<T, SweepError>;

/// Everything that can go wrong while loading, cleaning, charting or
/// exporting a single file. None of these abort the session.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("{file} is empty! Please upload a valid file.")]
    EmptyTable { file: String },

    #[error("Not enough numerical columns for visualization.")]
    InsufficientNumericColumns,

    #[error("No columns selected to convert.")]
    NoColumnsSelected,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A CSV record carries more fields than the header row.
    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("table does not fit in a worksheet: {0}")]
    SheetTooLarge(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    #[error("xlsx writer error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
