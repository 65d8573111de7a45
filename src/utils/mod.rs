//! Shared utilities
//!
//! - `date`: `YYYYMMDD` parsing and age arithmetic
//! - `io`: archive periods, source discovery and Parquet output
//! - `logging`: log helpers, progress bars and console summaries

pub mod date;
pub mod io;
pub mod logging;

pub use date::{ParseFault, age_in_years, parse_date};
pub use io::{SourcePeriod, find_source_files, write_parquet};
