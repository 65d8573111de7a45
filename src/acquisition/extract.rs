//! Archive extraction
//!
//! Entries are unpacked into a hidden staging directory next to the target and
//! the staging directory is renamed into place. A period directory therefore
//! either does not exist or holds a complete extraction.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use zip::ZipArchive;

use crate::error::util::ensure_directory;
use crate::error::{DecesError, Result};

/// Prefix of staging directories; hidden so discovery never reads them
pub const STAGING_PREFIX: &str = ".partial-";

/// Result of an extraction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The archive was unpacked into the target; holds the number of entries
    Completed(usize),
    /// Another writer created the target first; the staged copy was discarded
    Superseded,
}

/// Unpack the zip held in `bytes` into `target`, which must be inside `data_dir`
pub fn extract_atomically(bytes: &[u8], data_dir: &Path, target: &Path) -> Result<Extraction> {
    ensure_directory(data_dir)?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let entries = archive.len();

    // Dropping the guard removes whatever is left of the staging directory
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(data_dir)
        .map_err(|e| DecesError::io(data_dir, e))?;

    archive.extract(staging.path())?;

    match fs::rename(staging.path(), target) {
        Ok(()) => Ok(Extraction::Completed(entries)),
        Err(_) if target.is_dir() => {
            log::warn!(
                "{} was created concurrently, discarding staged extraction",
                target.display()
            );
            Ok(Extraction::Superseded)
        }
        Err(e) => Err(DecesError::io(target, e)),
    }
}
