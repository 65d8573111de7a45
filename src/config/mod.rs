//! Configuration for the mortality pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{DecesError, Result};

/// Base URL of the per-decade archives (1970-1979 ... 2010-2019)
pub const DEFAULT_DECADE_BASE_URL: &str = "https://www.insee.fr/fr/statistiques/fichier/4769950";

/// Base URL of the per-year archives (2020 onwards)
pub const DEFAULT_YEARLY_BASE_URL: &str = "https://www.insee.fr/fr/statistiques/fichier/4190491";

/// First year published by INSEE
pub const DEFAULT_MIN_YEAR: i32 = 1970;

/// Last year the pipeline knows how to fetch
pub const DEFAULT_MAX_YEAR: i32 = 2023;

/// What to do with rows that appear more than once across the source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every row, as the files are simply concatenated
    #[default]
    Keep,
    /// Drop rows whose projected fields are identical to an earlier row
    DropExact,
}

/// What to do with a source file whose header lacks a required column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// Abort the load with [`DecesError::MissingColumns`]
    #[default]
    Fail,
    /// Log the mismatch, skip the file and keep loading the others
    Skip,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory that receives one sub-directory per extracted period
    pub data_dir: PathBuf,
    /// Base URL of the per-decade archives
    pub decade_base_url: String,
    /// Base URL of the per-year archives
    pub yearly_base_url: String,
    /// First year that can be requested
    pub min_year: i32,
    /// Last year that can be requested
    pub max_year: i32,
    /// Field delimiter of the source files
    pub delimiter: u8,
    /// Duplicate handling during ingestion
    pub duplicates: DuplicatePolicy,
    /// Column layout mismatch handling during ingestion
    pub layout: LayoutPolicy,
    /// Drop rows whose death year differs from the requested year
    pub restrict_to_year: bool,
    /// Number of threads used to parse source files
    pub parse_threads: usize,
    /// HTTP timeout in seconds
    pub http_timeout_secs: u64,
    /// Lifetime of cached stage results in seconds, `None` for no expiry
    pub cache_ttl_secs: Option<u64>,
    /// Show progress bars for downloads and parsing
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            decade_base_url: DEFAULT_DECADE_BASE_URL.to_string(),
            yearly_base_url: DEFAULT_YEARLY_BASE_URL.to_string(),
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            delimiter: b';',
            duplicates: DuplicatePolicy::default(),
            layout: LayoutPolicy::default(),
            restrict_to_year: true,
            parse_threads: num_cpus::get(),
            http_timeout_secs: 300,
            cache_ttl_secs: None,
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    /// Create a default configuration rooted at `data_dir`
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.min_year > self.max_year {
            return Err(DecesError::Config(format!(
                "min_year {} is after max_year {}",
                self.min_year, self.max_year
            )));
        }
        if self.parse_threads == 0 {
            return Err(DecesError::Config(
                "parse_threads must be at least 1".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(DecesError::Config(format!(
                "delimiter {:#04x} is not an ASCII byte",
                self.delimiter
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, policy: LayoutPolicy) -> Self {
        self.layout = policy;
        self
    }

    #[must_use]
    pub fn with_restrict_to_year(mut self, restrict: bool) -> Self {
        self.restrict_to_year = restrict;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl_secs = ttl.map(|d| d.as_secs());
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// HTTP timeout as a [`Duration`]
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Cache lifetime as a [`Duration`]
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}
