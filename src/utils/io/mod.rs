//! I/O utilities
//!
//! - `paths`: archive periods and source file discovery
//! - `parquet`: Parquet output

pub mod parquet;
pub mod paths;

pub use self::parquet::write_parquet;
pub use paths::{SourcePeriod, find_source_files};
