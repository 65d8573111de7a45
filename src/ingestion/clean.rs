//! Cleaning and derivation steps
//!
//! Each step is a separate function so the drop policy can be tested on its
//! own. A row that fails a step is dropped and tallied, never reported as an
//! error.

use rustc_hash::FxHashSet;

use crate::ingestion::reader::{BIRTH_DATE, DEATH_DATE, RawRecord};
use crate::models::{DeathRecord, IngestionStats, Sex};
use crate::utils::date::{ParseFault, parse_date};

/// Why a row was dropped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowFault {
    /// A date column is empty or not a calendar date
    #[error("invalid {field}: {fault}")]
    InvalidDate {
        field: &'static str,
        fault: ParseFault,
    },
    /// The sex code is empty or not 1/2
    #[error("invalid sex code {0:?}")]
    InvalidSex(Option<String>),
    /// The death date precedes the birth date
    #[error("death precedes birth")]
    NegativeAge,
    /// The death year is not the requested one
    #[error("death year {0} outside the requested year")]
    OutsideYear(i32),
}

/// Remove rows identical to an earlier row, keeping the first occurrence
///
/// Returns the remaining rows in their original order and the number removed.
#[must_use]
pub fn remove_duplicates(rows: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let before = rows.len();
    let mut seen: FxHashSet<RawRecord> = FxHashSet::default();
    let kept: Vec<RawRecord> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

fn parse_date_field(
    value: Option<&str>,
    field: &'static str,
) -> Result<chrono::NaiveDate, RowFault> {
    parse_date(value.unwrap_or_default()).map_err(|fault| RowFault::InvalidDate { field, fault })
}

/// Turn a raw row into a derived record
///
/// Dates are checked before the sex code, and both before the age, so a row
/// with several defects is attributed to the first one.
pub fn derive_record(raw: &RawRecord) -> Result<DeathRecord, RowFault> {
    let birth = parse_date_field(raw.birth_date.as_deref(), BIRTH_DATE)?;
    let death = parse_date_field(raw.death_date.as_deref(), DEATH_DATE)?;
    let sex = raw
        .sex
        .as_deref()
        .and_then(Sex::parse)
        .ok_or_else(|| RowFault::InvalidSex(raw.sex.clone()))?;

    let record = DeathRecord::new(birth, death, sex).ok_or(RowFault::NegativeAge)?;
    Ok(record.with_places(
        raw.birth_country.clone(),
        raw.birth_place.clone(),
        raw.death_place.clone(),
    ))
}

/// Keep only records whose death year is `year`
pub fn check_year(record: DeathRecord, year: Option<i32>) -> Result<DeathRecord, RowFault> {
    match year {
        Some(year) if record.death_year != year => Err(RowFault::OutsideYear(record.death_year)),
        _ => Ok(record),
    }
}

/// Count a dropped row in `stats`
pub fn tally(stats: &mut IngestionStats, fault: &RowFault) {
    match fault {
        RowFault::InvalidDate { .. } => stats.invalid_dates += 1,
        RowFault::InvalidSex(_) => stats.invalid_sex += 1,
        RowFault::NegativeAge => stats.negative_ages += 1,
        RowFault::OutsideYear(_) => stats.outside_year += 1,
    }
}

/// Derive every row, dropping faulty ones, preserving input order
///
/// When `year` is given, records dying in another year are dropped too.
pub fn derive_records(
    rows: &[RawRecord],
    year: Option<i32>,
    stats: &mut IngestionStats,
) -> Vec<DeathRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for raw in rows {
        match derive_record(raw).and_then(|record| check_year(record, year)) {
            Ok(record) => records.push(record),
            Err(fault) => {
                log::trace!("Dropping row {raw:?}: {fault}");
                tally(stats, &fault);
            }
        }
    }
    records
}
