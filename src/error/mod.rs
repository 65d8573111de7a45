//! Error handling for the mortality pipeline.
//!
//! Library operations return [`DecesError`]. Faults that only cause a row to be
//! dropped (bad dates, invalid sex codes, negative ages) are not errors; see
//! [`crate::utils::date::ParseFault`] and [`crate::ingestion::RowFault`].

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the mortality pipeline
#[derive(Debug, thiserror::Error)]
pub enum DecesError {
    /// Error opening, reading or writing a local path
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The downloaded archive could not be read or extracted
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A source file is not valid delimited text
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A source file lacks one of the projected columns
    #[error("{} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// A year outside the published range was requested
    #[error("Year {year} is outside the supported range {min}..={max}")]
    UnsupportedYear { year: i32, min: i32, max: i32 },

    /// A period label could not be parsed
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error building Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting records to Arrow
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_arrow::Error),

    /// Error reading a JSON configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecesError {
    /// Wrap an [`io::Error`] with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a [`csv::Error`] with the file it happened in
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error describes a source file with an unexpected column layout
    #[must_use]
    pub fn is_layout_mismatch(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DecesError>;
