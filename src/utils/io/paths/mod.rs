//! Path utilities for the local copy of the death files
//!
//! - `period`: archive periods, their URLs and their local directories
//! - `discovery`: finding extracted source files for a year

pub mod discovery;
pub mod period;

pub use discovery::{available_years, extract_year, find_source_files};
pub use period::SourcePeriod;
