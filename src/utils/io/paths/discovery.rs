//! Discovery of extracted source files
//!
//! Files are matched by a plain substring of their file name (e.g. the year
//! `2020` matches `Deces_2020.csv` and `Deces_2020_M01.csv`). Hidden entries,
//! including in-flight extraction directories, are never visited.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{DecesError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// File extensions recognised as death files
pub const SOURCE_EXTENSIONS: [&str; 2] = ["csv", "txt"];

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn collect_source_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| DecesError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| DecesError::io(dir, e))?.path();
        if is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            collect_source_files(&path, out)?;
        } else if path.is_file() && is_source_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Find every source file under `data_dir` whose file name contains `pattern`
///
/// The result is sorted by file name, then by full path, so concatenating the
/// files in this order is deterministic. A missing `data_dir` yields no files.
pub fn find_source_files(data_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        log_warning("Data directory does not exist", Some(data_dir));
        return Ok(Vec::new());
    }

    log_operation_start("Searching for source files in", data_dir);

    let mut files = Vec::new();
    collect_source_files(data_dir, &mut files)?;

    let matching = files
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(pattern))
        })
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)))
        .collect_vec();

    if matching.is_empty() {
        log::warn!(
            "No source files matching '{pattern}' under {}",
            data_dir.display()
        );
    } else {
        log_operation_complete("Found", data_dir, matching.len(), None);
    }

    Ok(matching)
}

/// Extract the year embedded in a source file name
///
/// Recognises names such as `Deces_2020.csv`, `deces-1975.txt` and
/// `Deces_2022_M01.csv`.
#[must_use]
pub fn extract_year(filename: &str) -> Option<i32> {
    lazy_static! {
        static ref YEAR_IN_FILENAME: Regex =
            Regex::new(r"(?i)deces[_-]?(\d{4})(?:[_.-]|$)").unwrap();
    }

    let base_name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename);

    YEAR_IN_FILENAME
        .captures(base_name)
        .and_then(|caps| caps[1].parse::<i32>().ok())
}

/// Years for which at least one source file is present under `data_dir`
pub fn available_years(data_dir: &Path) -> Result<Vec<i32>> {
    if !data_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    collect_source_files(data_dir, &mut files)?;

    Ok(files
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .filter_map(extract_year)
        .sorted()
        .dedup()
        .collect())
}
