use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file on disk into a [`Dataset`](crate::data::model::Dataset).
///
/// Every variant is fatal to startup: the dashboard has nothing to render
/// without a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unreadable arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// Rejected [`FilterCriteria`](crate::data::model::FilterCriteria).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("year range is inverted: {year_min} > {year_max}")]
    InvertedRange { year_min: i32, year_max: i32 },

    #[error("entity '{0}' is not present in the dataset")]
    UnknownEntity(String),
}

pub type LoadResult<T> = Result<T, LoadError>;
