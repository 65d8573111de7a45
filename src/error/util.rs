//! Utility functions for error handling
//!
//! Thin wrappers over `std::fs` that attach the offending path to every error.

use std::fs;
use std::path::Path;

use crate::error::{DecesError, Result};

/// Open a file for reading, reporting the path on failure
pub fn safe_open_file(path: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|e| DecesError::io(path, e))
}

/// Create a directory and its parents, reporting the path on failure
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| DecesError::io(path, e))
}

/// Read a file to string, reporting the path on failure
pub fn safe_read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| DecesError::io(path, e))
}
