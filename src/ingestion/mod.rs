//! Ingestion stage
//!
//! Reads the extracted source files for a year, concatenates them in sorted
//! file-name order, cleans the rows and derives the computed fields.

pub mod clean;
pub mod reader;

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::{DuplicatePolicy, LayoutPolicy, PipelineConfig};
use crate::error::{DecesError, Result};
use crate::models::{Dataset, IngestionStats};
use crate::utils::io::paths::find_source_files;
use crate::utils::logging::{
    create_file_progress_bar, finish_progress_bar, log_operation_complete, log_rows_dropped,
    log_warning,
};

pub use clean::{RowFault, derive_record, derive_records, remove_duplicates};
pub use reader::{RawRecord, read_source_file};

/// Load the dataset for `year` from the files under `config.data_dir`
///
/// Files are selected by the year appearing in their name. When
/// `config.restrict_to_year` is set, only deaths in `year` are kept. No
/// matching file yields an empty dataset.
pub fn load(config: &PipelineConfig, year: i32) -> Result<Dataset> {
    let files = find_source_files(&config.data_dir, &year.to_string())?;
    load_year_files(config, &files, year)
}

/// Build the dataset for `year` from an already-discovered file list
pub fn load_year_files(config: &PipelineConfig, files: &[PathBuf], year: i32) -> Result<Dataset> {
    let filter_year = config.restrict_to_year.then_some(year);
    ingest(config, files, Some(year), filter_year)
}

/// Load every file whose name contains `pattern`, without a year filter
pub fn load_matching(config: &PipelineConfig, pattern: &str) -> Result<Dataset> {
    let files = find_source_files(&config.data_dir, pattern)?;
    load_files(config, &files, None)
}

/// Parse, concatenate and clean `files` in the given order
///
/// When `year` is given, records whose death year differs are dropped.
pub fn load_files(
    config: &PipelineConfig,
    files: &[PathBuf],
    year: Option<i32>,
) -> Result<Dataset> {
    ingest(config, files, year, year)
}

fn ingest(
    config: &PipelineConfig,
    files: &[PathBuf],
    label: Option<i32>,
    filter_year: Option<i32>,
) -> Result<Dataset> {
    if files.is_empty() {
        return Ok(Dataset::empty(label));
    }

    let start = Instant::now();
    let parsed = parse_all(config, files)?;

    let mut stats = IngestionStats::default();
    let mut rows: Vec<RawRecord> = Vec::new();
    for (path, result) in files.iter().zip(parsed) {
        match result {
            Ok(file_rows) => {
                stats.files_read += 1;
                stats.rows_read += file_rows.len();
                rows.extend(file_rows);
            }
            Err(e) if e.is_layout_mismatch() && config.layout == LayoutPolicy::Skip => {
                log_warning(&format!("Skipping file with unexpected layout ({e})"), Some(path));
                stats.files_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if config.duplicates == DuplicatePolicy::DropExact {
        let (kept, removed) = remove_duplicates(rows);
        rows = kept;
        stats.duplicates_removed = removed;
        log_rows_dropped("Duplicate removal", removed, rows.len());
    }

    let records = derive_records(&rows, filter_year, &mut stats);
    log_rows_dropped(
        "Cleaning",
        stats.invalid_dates + stats.invalid_sex + stats.negative_ages + stats.outside_year,
        records.len(),
    );

    log_operation_complete("Loaded", &config.data_dir, records.len(), Some(start.elapsed()));

    Ok(Dataset::new(label, records, stats))
}

/// Parse each file, in parallel, keeping one result per file in input order
fn parse_all(config: &PipelineConfig, files: &[PathBuf]) -> Result<Vec<Result<Vec<RawRecord>>>> {
    let pb = create_file_progress_bar(files.len() as u64, config.show_progress);
    let delimiter = config.delimiter;
    let read = |path: &PathBuf| {
        let result = read_source_file(path, delimiter);
        pb.inc(1);
        result
    };

    let results: Vec<Result<Vec<RawRecord>>> = if config.parse_threads <= 1 || files.len() == 1 {
        files.iter().map(read).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parse_threads.min(files.len()))
            .build()
            .map_err(|e| DecesError::Config(format!("cannot build parsing pool: {e}")))?;
        pool.install(|| files.par_iter().map(read).collect())
    };

    finish_progress_bar(&pb, None);
    Ok(results)
}
