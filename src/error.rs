use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce the base dataset. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("expected a top-level JSON array of objects")]
    JsonShape,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

/// The tabular encoder could not serialise the rows it was handed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a single query; the dataset is never affected.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("'{0}' is not an ISO-8601 date")]
    InvalidDate(String),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
