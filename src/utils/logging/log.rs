//! Log lines shared by the pipeline stages

use std::path::Path;
use std::time::Duration;

/// `<action> <path>` at info level
pub fn log_operation_start(action: &str, path: &Path) {
    log::info!("{action} {}", path.display());
}

/// Text of a completion line: `<action> <count> items (<path>)`, plus the
/// elapsed time when the step was timed
#[must_use]
pub fn completion_message(
    action: &str,
    path: &Path,
    count: usize,
    elapsed: Option<Duration>,
) -> String {
    let mut line = format!("{action} {count} items ({})", path.display());
    if let Some(elapsed) = elapsed {
        line.push_str(&format!(" in {elapsed:.2?}"));
    }
    line
}

pub fn log_operation_complete(action: &str, path: &Path, count: usize, elapsed: Option<Duration>) {
    log::info!("{}", completion_message(action, path, count, elapsed));
}

/// Warning tied to `path` when there is one
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message} ({})", path.display()),
        None => log::warn!("{message}"),
    }
}

/// Rows removed by one cleaning step; debug level when nothing was removed
pub fn log_rows_dropped(step: &str, dropped: usize, remaining: usize) {
    if dropped == 0 {
        log::debug!("{step}: no rows dropped ({remaining} remaining)");
    } else {
        log::info!("{step}: dropped {dropped} rows ({remaining} remaining)");
    }
}
