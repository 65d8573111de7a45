//! Domain models for decease events
//!
//! - `record`: a single decease event and its sex code
//! - `age_bucket`: the eleven fixed age ranges
//! - `dataset`: the cleaned collection and its read-only queries

pub mod age_bucket;
pub mod dataset;
pub mod record;

pub use age_bucket::AgeBucket;
pub use dataset::{Dataset, IngestionStats, MonthlyCounts};
pub use record::{DeathRecord, Sex};
