//! The cleaned collection of death records for a requested period
//!
//! A [`Dataset`] is built by ingestion and only read afterwards. The query
//! methods below are the read-only views the dashboard layer consumes.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;
use crate::models::age_bucket::AgeBucket;
use crate::models::record::{DeathRecord, Sex};

/// Counters collected while building a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionStats {
    /// Source files parsed
    pub files_read: usize,
    /// Source files skipped because of their column layout
    pub files_skipped: usize,
    /// Data rows read across all files
    pub rows_read: usize,
    /// Rows removed as exact duplicates
    pub duplicates_removed: usize,
    /// Rows dropped because a date was missing or unparseable
    pub invalid_dates: usize,
    /// Rows dropped because the sex code was missing or not 1/2
    pub invalid_sex: usize,
    /// Rows dropped because death precedes birth
    pub negative_ages: usize,
    /// Rows dropped because the death year differs from the requested year
    pub outside_year: usize,
}

impl IngestionStats {
    /// Total rows removed by cleaning
    #[must_use]
    pub fn rows_dropped(&self) -> usize {
        self.duplicates_removed
            + self.invalid_dates
            + self.invalid_sex
            + self.negative_ages
            + self.outside_year
    }
}

/// Monthly death counts split by sex, indexed by month - 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    pub total: [usize; 12],
    pub women: [usize; 12],
    pub men: [usize; 12],
}

/// Ordered collection of death records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    year: Option<i32>,
    records: Vec<DeathRecord>,
    stats: IngestionStats,
}

/// Flat row used for Arrow conversion
#[derive(Serialize, Deserialize)]
struct RecordRow {
    birth_date: String,
    death_date: String,
    sex: u8,
    birth_country: Option<String>,
    birth_place: Option<String>,
    death_place: Option<String>,
    age: f64,
    death_year: i32,
    death_month: u32,
    age_bucket: String,
}

impl From<&DeathRecord> for RecordRow {
    fn from(record: &DeathRecord) -> Self {
        Self {
            birth_date: record.birth_date.format("%Y-%m-%d").to_string(),
            death_date: record.death_date.format("%Y-%m-%d").to_string(),
            sex: record.sex.code(),
            birth_country: record.birth_country.clone(),
            birth_place: record.birth_place.clone(),
            death_place: record.death_place.clone(),
            age: record.age,
            death_year: record.death_year,
            death_month: record.death_month,
            age_bucket: record.age_bucket.label().to_string(),
        }
    }
}

impl Dataset {
    /// Wrap already-cleaned records
    #[must_use]
    pub fn new(year: Option<i32>, records: Vec<DeathRecord>, stats: IngestionStats) -> Self {
        Self {
            year,
            records,
            stats,
        }
    }

    /// An empty dataset for `year`
    #[must_use]
    pub fn empty(year: Option<i32>) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// Year the dataset was requested for
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    #[must_use]
    pub fn records(&self) -> &[DeathRecord] {
        &self.records
    }

    #[must_use]
    pub fn stats(&self) -> &IngestionStats {
        &self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeathRecord> {
        self.records.iter()
    }

    /// Records of one sex, in their original order
    ///
    /// The view describes no load of its own, so its stats are empty.
    #[must_use]
    pub fn by_sex(&self, sex: Sex) -> Self {
        Self {
            year: self.year,
            records: self
                .records
                .iter()
                .filter(|r| r.sex == sex)
                .cloned()
                .collect(),
            stats: IngestionStats::default(),
        }
    }

    #[must_use]
    pub fn women(&self) -> Self {
        self.by_sex(Sex::Female)
    }

    #[must_use]
    pub fn men(&self) -> Self {
        self.by_sex(Sex::Male)
    }

    /// Number of deaths per month (1-12); months without deaths are absent
    #[must_use]
    pub fn count_by_month(&self) -> BTreeMap<u32, usize> {
        self.records.iter().map(|r| r.death_month).counts().into_iter().collect()
    }

    /// Number of deaths per year
    #[must_use]
    pub fn count_by_year(&self) -> BTreeMap<i32, usize> {
        self.records.iter().map(|r| r.death_year).counts().into_iter().collect()
    }

    /// Monthly counts for everyone, women and men
    #[must_use]
    pub fn monthly_counts_by_sex(&self) -> MonthlyCounts {
        let mut counts = MonthlyCounts::default();
        for record in &self.records {
            let idx = (record.death_month - 1) as usize;
            counts.total[idx] += 1;
            match record.sex {
                Sex::Female => counts.women[idx] += 1,
                Sex::Male => counts.men[idx] += 1,
            }
        }
        counts
    }

    /// The `n` most frequent countries of birth, most frequent first
    ///
    /// Ties are broken by country name. Records without a country are ignored.
    #[must_use]
    pub fn top_birth_countries(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for country in self.records.iter().filter_map(|r| r.birth_country.as_deref()) {
            *counts.entry(country).or_default() += 1;
        }
        counts
            .into_iter()
            .sorted_by_key(|&(country, count)| (Reverse(count), country))
            .take(n)
            .map(|(country, count)| (country.to_string(), count))
            .collect()
    }

    /// Deaths per age bucket, all eleven buckets in ascending order
    #[must_use]
    pub fn age_bucket_counts(&self) -> Vec<(AgeBucket, usize)> {
        let mut counts = [0usize; 11];
        for record in &self.records {
            counts[record.age_bucket.index()] += 1;
        }
        AgeBucket::ALL.iter().copied().zip(counts).collect()
    }

    /// Histogram of ages over `[0, max_age)` in `bins` equal-width bins
    ///
    /// Ages at or above `max_age` are not counted. Returns an empty vector when
    /// `bins` is zero or `max_age` is not positive.
    #[must_use]
    pub fn age_histogram(&self, bins: usize, max_age: f64) -> Vec<usize> {
        if bins == 0 || max_age.is_nan() || max_age <= 0.0 {
            return Vec::new();
        }
        let width = max_age / bins as f64;
        let mut histogram = vec![0usize; bins];
        for record in &self.records {
            if record.age < max_age {
                let idx = ((record.age / width) as usize).min(bins - 1);
                histogram[idx] += 1;
            }
        }
        histogram
    }

    /// Convert the records to an Arrow record batch
    ///
    /// Dates are ISO-8601 strings, sex is its numeric code and the age bucket is
    /// its label.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields = Vec::<FieldRef>::from_type::<RecordRow>(
            TracingOptions::default().allow_null_fields(true),
        )?;
        let rows: Vec<RecordRow> = self.records.iter().map(RecordRow::from).collect();
        Ok(serde_arrow::to_record_batch(&fields, &rows)?)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DeathRecord;
    type IntoIter = std::slice::Iter<'a, DeathRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
