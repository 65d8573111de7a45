//! A Rust library for downloading, cleaning and querying the French national
//! mortality files published by INSEE.

pub mod acquisition;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod models;
pub mod pipeline;
pub mod utils;

// Core types
pub use config::{DuplicatePolicy, LayoutPolicy, PipelineConfig};
pub use error::{DecesError, Result};
pub use pipeline::Pipeline;

// Stages
pub use acquisition::{AcquisitionOutcome, ArchiveFetcher, FetchError, HttpFetcher, ensure_local};
pub use ingestion::load;

// Data model
pub use models::{AgeBucket, Dataset, DeathRecord, IngestionStats, MonthlyCounts, Sex};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Utility functions
pub use utils::{SourcePeriod, age_in_years, find_source_files, parse_date, write_parquet};
