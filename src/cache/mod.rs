//! Keyed cache for stage results
//!
//! Entries are addressed by `(stage, period)` and carry a [`Fingerprint`] of
//! the files they were computed from. A lookup with a different fingerprint,
//! or after the time-to-live has elapsed, evicts the entry and misses.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use rustc_hash::FxHashMap;

use crate::error::{DecesError, Result};

/// Pipeline stage a cached value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Acquisition,
    Ingestion,
}

/// Address of a cached value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub stage: Stage,
    /// Canonical period identifier ("2020", "1970-1979", ...)
    pub period: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(stage: Stage, period: impl Into<String>) -> Self {
        Self {
            stage,
            period: period.into(),
        }
    }
}

/// Summary of the files a value was computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fingerprint {
    pub entries: usize,
    pub bytes: u64,
    pub latest_modified: Option<SystemTime>,
}

impl Fingerprint {
    /// Fingerprint a list of files
    pub fn of_files(paths: &[PathBuf]) -> Result<Self> {
        let mut fingerprint = Self::default();
        for path in paths {
            let metadata = fs::metadata(path).map_err(|e| DecesError::io(path, e))?;
            fingerprint.absorb(&metadata);
        }
        Ok(fingerprint)
    }

    /// Fingerprint a single path; a missing path has the empty fingerprint
    pub fn of_path(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(metadata) => {
                let mut fingerprint = Self::default();
                fingerprint.absorb(&metadata);
                Ok(fingerprint)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DecesError::io(path, e)),
        }
    }

    fn absorb(&mut self, metadata: &fs::Metadata) {
        self.entries += 1;
        self.bytes += metadata.len();
        let modified = metadata.modified().ok();
        self.latest_modified = self.latest_modified.max(modified);
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    fingerprint: Fingerprint,
    stored_at: Instant,
}

/// Cache of stage results with fingerprint and TTL invalidation
#[derive(Debug)]
pub struct KeyedCache<V> {
    entries: FxHashMap<CacheKey, Entry<V>>,
    ttl: Option<Duration>,
    stats: CacheStats,
}

impl<V: Clone> KeyedCache<V> {
    /// Create a cache whose entries expire after `ttl` (`None` for never)
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: FxHashMap::default(),
            ttl,
            stats: CacheStats::default(),
        }
    }

    /// Look up `key`, evicting the entry if it is stale for `current`
    pub fn get(&mut self, key: &CacheKey, current: &Fingerprint) -> Option<V> {
        let fresh = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(entry) => {
                entry.fingerprint == *current
                    && self.ttl.is_none_or(|ttl| entry.stored_at.elapsed() < ttl)
            }
        };

        if fresh {
            self.stats.hits += 1;
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            log::debug!("Evicting stale cache entry {key:?}");
            self.entries.remove(key);
            self.stats.evictions += 1;
            self.stats.misses += 1;
            None
        }
    }

    /// Store `value` under `key`
    pub fn insert(&mut self, key: CacheKey, value: V, fingerprint: Fingerprint) {
        self.entries.insert(
            key,
            Entry {
                value,
                fingerprint,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop one entry; returns whether it existed
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop the entries of every stage for `period`
    pub fn invalidate_period(&mut self, period: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.period != period);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
