//! Acquisition stage
//!
//! Turns a requested year into a local directory of extracted source files,
//! downloading the period's archive at most once. Transport failures are
//! reported as [`AcquisitionOutcome::Unavailable`] instead of an error so a
//! single missing archive does not abort the caller; nothing is retried.

pub mod extract;
pub mod fetch;

use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::utils::io::paths::SourcePeriod;
use crate::utils::logging::{create_spinner, finish_progress_bar, log_operation_complete};

pub use extract::{Extraction, extract_atomically};
pub use fetch::{ArchiveFetcher, FetchError, HttpFetcher};

/// What [`ensure_local`] did for a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// The period directory already existed; no network I/O happened
    AlreadyPresent { period: SourcePeriod, dir: PathBuf },
    /// The archive was downloaded and extracted
    Extracted {
        period: SourcePeriod,
        dir: PathBuf,
        entries: usize,
    },
    /// The archive could not be downloaded; the local directory is untouched
    Unavailable {
        period: SourcePeriod,
        url: String,
        error: FetchError,
    },
}

impl AcquisitionOutcome {
    #[must_use]
    pub fn period(&self) -> SourcePeriod {
        match self {
            Self::AlreadyPresent { period, .. }
            | Self::Extracted { period, .. }
            | Self::Unavailable { period, .. } => *period,
        }
    }

    /// Local directory of the period, if its files are available
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::AlreadyPresent { dir, .. } | Self::Extracted { dir, .. } => Some(dir),
            Self::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.dir().is_some()
    }

    /// How a later call for the same period reports this outcome
    ///
    /// Once extracted, a period is simply present on disk.
    #[must_use]
    pub fn settled(&self) -> Self {
        match self {
            Self::Extracted { period, dir, .. } => Self::AlreadyPresent {
                period: *period,
                dir: dir.clone(),
            },
            other => other.clone(),
        }
    }
}

/// Make sure the archive containing `year` is extracted under `config.data_dir`
pub fn ensure_local<F>(
    config: &PipelineConfig,
    fetcher: &F,
    year: i32,
) -> Result<AcquisitionOutcome>
where
    F: ArchiveFetcher + ?Sized,
{
    let period = SourcePeriod::for_year(year, config)?;
    ensure_period(config, fetcher, period)
}

/// Make sure `period` is extracted under `config.data_dir`
pub fn ensure_period<F>(
    config: &PipelineConfig,
    fetcher: &F,
    period: SourcePeriod,
) -> Result<AcquisitionOutcome>
where
    F: ArchiveFetcher + ?Sized,
{
    let dir = period.local_dir(&config.data_dir);
    if dir.is_dir() {
        log::debug!("{} already extracted in {}", period, dir.display());
        return Ok(AcquisitionOutcome::AlreadyPresent { period, dir });
    }

    let url = period.archive_url(config);
    log::info!("Downloading {url}");
    let start = Instant::now();
    let spinner = create_spinner(&format!("Downloading {url}"), config.show_progress);

    let bytes = match fetcher.fetch(&url) {
        Ok(bytes) => bytes,
        Err(error) => {
            finish_progress_bar(&spinner, Some("download failed"));
            log::warn!("Could not download {period}: {error}");
            return Ok(AcquisitionOutcome::Unavailable { period, url, error });
        }
    };
    finish_progress_bar(&spinner, None);

    match extract_atomically(&bytes, &config.data_dir, &dir)? {
        Extraction::Completed(entries) => {
            log_operation_complete("Extracted", &dir, entries, Some(start.elapsed()));
            Ok(AcquisitionOutcome::Extracted {
                period,
                dir,
                entries,
            })
        }
        Extraction::Superseded => Ok(AcquisitionOutcome::AlreadyPresent { period, dir }),
    }
}

/// Acquire every period covering `years`, each period once, in chronological order
pub fn ensure_years<F, I>(
    config: &PipelineConfig,
    fetcher: &F,
    years: I,
) -> Result<Vec<AcquisitionOutcome>>
where
    F: ArchiveFetcher + ?Sized,
    I: IntoIterator<Item = i32>,
{
    let periods: Vec<SourcePeriod> = years
        .into_iter()
        .map(|year| SourcePeriod::for_year(year, config))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted()
        .dedup()
        .collect();

    periods
        .into_iter()
        .map(|period| ensure_period(config, fetcher, period))
        .collect()
}
