//! Pipeline orchestration
//!
//! A [`Pipeline`] chains acquisition and ingestion for a selected year and
//! remembers the result of each stage. Selecting a year re-runs a stage only
//! when its cached result is missing, expired or computed from files that
//! have since changed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::acquisition::{self, AcquisitionOutcome, ArchiveFetcher, HttpFetcher};
use crate::cache::{CacheKey, CacheStats, Fingerprint, KeyedCache, Stage};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingestion;
use crate::models::Dataset;
use crate::utils::io::paths::{SourcePeriod, find_source_files};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Acquisition and ingestion with per-stage result caching
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Box<dyn ArchiveFetcher>,
    acquisitions: Mutex<KeyedCache<AcquisitionOutcome>>,
    datasets: Mutex<KeyedCache<Arc<Dataset>>>,
    selected: Mutex<Option<i32>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("selected", &self.selected_year())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline that downloads over HTTP
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.http_timeout())?;
        Self::with_fetcher(config, fetcher)
    }

    /// Create a pipeline with a custom archive fetcher
    pub fn with_fetcher<F>(config: PipelineConfig, fetcher: F) -> Result<Self>
    where
        F: ArchiveFetcher + 'static,
    {
        config.validate()?;
        let ttl = config.cache_ttl();
        Ok(Self {
            config,
            fetcher: Box::new(fetcher),
            acquisitions: Mutex::new(KeyedCache::new(ttl)),
            datasets: Mutex::new(KeyedCache::new(ttl)),
            selected: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Year of the last [`Pipeline::select_year`] call
    #[must_use]
    pub fn selected_year(&self) -> Option<i32> {
        *lock(&self.selected)
    }

    /// Acquisition stage for `year`, served from cache while the period
    /// directory is unchanged
    ///
    /// A cached extraction is reported as
    /// [`AcquisitionOutcome::AlreadyPresent`]. Unavailable outcomes are never
    /// cached, so a later call tries again.
    pub fn ensure_local(&self, year: i32) -> Result<AcquisitionOutcome> {
        let period = SourcePeriod::for_year(year, &self.config)?;
        let dir = period.local_dir(&self.config.data_dir);
        let key = CacheKey::new(Stage::Acquisition, period.label());

        let current = Fingerprint::of_path(&dir)?;
        if let Some(outcome) = lock(&self.acquisitions).get(&key, &current) {
            log::debug!("Acquisition of {period} served from cache");
            return Ok(outcome);
        }

        let outcome = acquisition::ensure_period(&self.config, self.fetcher.as_ref(), period)?;
        if outcome.is_available() {
            let fingerprint = Fingerprint::of_path(&dir)?;
            lock(&self.acquisitions).insert(key, outcome.settled(), fingerprint);
        }
        Ok(outcome)
    }

    /// Ingestion stage for `year`, served from cache while its source files
    /// are unchanged
    pub fn load(&self, year: i32) -> Result<Arc<Dataset>> {
        let files = find_source_files(&self.config.data_dir, &year.to_string())?;
        let key = CacheKey::new(Stage::Ingestion, year.to_string());

        let current = Fingerprint::of_files(&files)?;
        if let Some(dataset) = lock(&self.datasets).get(&key, &current) {
            log::debug!("Dataset for {year} served from cache");
            return Ok(dataset);
        }

        let dataset = Arc::new(ingestion::load_year_files(&self.config, &files, year)?);
        lock(&self.datasets).insert(key, Arc::clone(&dataset), current);
        Ok(dataset)
    }

    /// Acquire then load `year`
    ///
    /// An unavailable archive is not an error: the dataset is built from
    /// whatever files are already present, which may be none.
    pub fn run(&self, year: i32) -> Result<Arc<Dataset>> {
        let outcome = self.ensure_local(year)?;
        if !outcome.is_available() {
            log::warn!("Source files for {year} are unavailable; loading what is on disk");
        }
        self.load(year)
    }

    /// Change the selected year and bring its stages up to date
    pub fn select_year(&self, year: i32) -> Result<Arc<Dataset>> {
        let previous = lock(&self.selected).replace(year);
        if previous != Some(year) {
            log::info!("Selected year {year}");
        }
        self.run(year)
    }

    /// Forget every cached result for `year`
    pub fn invalidate(&self, year: i32) -> Result<()> {
        let period = SourcePeriod::for_year(year, &self.config)?;
        lock(&self.acquisitions).invalidate(&CacheKey::new(Stage::Acquisition, period.label()));
        lock(&self.datasets).invalidate_period(&year.to_string());
        Ok(())
    }

    /// Forget every cached result
    pub fn clear_cache(&self) {
        lock(&self.acquisitions).clear();
        lock(&self.datasets).clear();
    }

    /// Counters of the acquisition and ingestion caches
    #[must_use]
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (lock(&self.acquisitions).stats(), lock(&self.datasets).stats())
    }
}
