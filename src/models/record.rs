//! Death record model
//!
//! A [`DeathRecord`] is one decease event with its derived fields already
//! attached. Construction refuses reversed dates, so every record satisfies
//! `age >= 0`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::age_bucket::AgeBucket;
use crate::utils::date::age_in_years;

/// Binary sex code used by INSEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Code 1
    Male,
    /// Code 2
    Female,
}

impl Sex {
    /// Map a numeric code to a sex
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }

    /// Parse the textual code found in source files ("1" or "2")
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u8>().ok().and_then(Self::from_code)
    }

    /// Numeric code
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("men"),
            Self::Female => f.write_str("women"),
        }
    }
}

/// One decease event with derived fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// Birth date
    pub birth_date: NaiveDate,
    /// Death date
    pub death_date: NaiveDate,
    /// Sex
    pub sex: Sex,
    /// Country of birth, absent for people born in France
    pub birth_country: Option<String>,
    /// Place of birth (commune code)
    pub birth_place: Option<String>,
    /// Place of death (commune code)
    pub death_place: Option<String>,
    /// Age at death in fractional years
    pub age: f64,
    /// Year of death
    pub death_year: i32,
    /// Month of death (1-12)
    pub death_month: u32,
    /// Age bucket of `age`
    pub age_bucket: AgeBucket,
}

impl DeathRecord {
    /// Build a record and derive its computed fields
    ///
    /// Returns `None` when `death_date` precedes `birth_date`.
    #[must_use]
    pub fn new(birth_date: NaiveDate, death_date: NaiveDate, sex: Sex) -> Option<Self> {
        let age = age_in_years(birth_date, death_date);
        let age_bucket = AgeBucket::from_age(age)?;
        Some(Self {
            birth_date,
            death_date,
            sex,
            birth_country: None,
            birth_place: None,
            death_place: None,
            age,
            death_year: death_date.year(),
            death_month: death_date.month(),
            age_bucket,
        })
    }

    /// Attach the optional origin and place fields
    #[must_use]
    pub fn with_places(
        mut self,
        birth_country: Option<String>,
        birth_place: Option<String>,
        death_place: Option<String>,
    ) -> Self {
        self.birth_country = birth_country;
        self.birth_place = birth_place;
        self.death_place = death_place;
        self
    }
}
