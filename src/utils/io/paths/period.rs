//! Source periods of the INSEE death files
//!
//! INSEE publishes deaths before 2020 in one archive per decade and deaths
//! from 2020 onwards in one archive per year. A [`SourcePeriod`] names one of
//! those archives and knows its download URL and its local directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::error::{DecesError, Result};

/// First year published as a single-year archive
pub const FIRST_YEARLY_ARCHIVE: i32 = 2020;

/// One downloadable archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourcePeriod {
    /// Ten years starting at the given year (e.g. 1970 for 1970-1979)
    Decade(i32),
    /// A single year
    Year(i32),
}

impl SourcePeriod {
    /// Resolve the archive that contains `year`, checking it against the configured range
    pub fn for_year(year: i32, config: &PipelineConfig) -> Result<Self> {
        if year < config.min_year || year > config.max_year {
            return Err(DecesError::UnsupportedYear {
                year,
                min: config.min_year,
                max: config.max_year,
            });
        }
        Ok(Self::containing(year))
    }

    /// The archive that would contain `year`, without range checks
    #[must_use]
    pub fn containing(year: i32) -> Self {
        if year < FIRST_YEARLY_ARCHIVE {
            Self::Decade(year.div_euclid(10) * 10)
        } else {
            Self::Year(year)
        }
    }

    /// First year covered
    #[must_use]
    pub fn first_year(&self) -> i32 {
        match self {
            Self::Decade(start) | Self::Year(start) => *start,
        }
    }

    /// Last year covered (inclusive)
    #[must_use]
    pub fn last_year(&self) -> i32 {
        match self {
            Self::Decade(start) => start + 9,
            Self::Year(year) => *year,
        }
    }

    /// Whether `year` falls in this period
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.first_year() <= year && year <= self.last_year()
    }

    /// Label used for the local directory and for cache keys
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Decade(start) => format!("{start}-{}", start + 9),
            Self::Year(year) => format!("{year}"),
        }
    }

    /// Download URL of the archive
    #[must_use]
    pub fn archive_url(&self, config: &PipelineConfig) -> String {
        match self {
            Self::Decade(start) => format!(
                "{}/deces-{start}-{}-csv.zip",
                config.decade_base_url.trim_end_matches('/'),
                start + 9
            ),
            Self::Year(year) => format!(
                "{}/Deces_{year}.zip",
                config.yearly_base_url.trim_end_matches('/')
            ),
        }
    }

    /// Directory the archive is extracted into
    #[must_use]
    pub fn local_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.label())
    }
}

impl fmt::Display for SourcePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for SourcePeriod {
    type Err = DecesError;

    /// Parse a period label
    ///
    /// Supported formats:
    /// - "2021" - Year
    /// - "1970-1979" - Decade (must start on a multiple of ten and span ten years)
    fn from_str(s: &str) -> Result<Self> {
        lazy_static! {
            static ref YEAR_PATTERN: Regex = Regex::new(r"^(\d{4})$").unwrap();
            static ref DECADE_PATTERN: Regex = Regex::new(r"^(\d{4})-(\d{4})$").unwrap();
        }

        let s = s.trim();
        if let Some(caps) = YEAR_PATTERN.captures(s) {
            let year = caps[1]
                .parse::<i32>()
                .map_err(|e| DecesError::InvalidPeriod(format!("{s}: {e}")))?;
            Ok(Self::Year(year))
        } else if let Some(caps) = DECADE_PATTERN.captures(s) {
            let start = caps[1]
                .parse::<i32>()
                .map_err(|e| DecesError::InvalidPeriod(format!("{s}: {e}")))?;
            let end = caps[2]
                .parse::<i32>()
                .map_err(|e| DecesError::InvalidPeriod(format!("{s}: {e}")))?;
            if start % 10 != 0 || end != start + 9 {
                return Err(DecesError::InvalidPeriod(format!(
                    "{s} is not a decade"
                )));
            }
            Ok(Self::Decade(start))
        } else {
            Err(DecesError::InvalidPeriod(format!(
                "Invalid period format: {s}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_resolution() {
        let config = PipelineConfig::default();
        assert_eq!(SourcePeriod::for_year(1972, &config).unwrap(), SourcePeriod::Decade(1970));
        assert_eq!(SourcePeriod::for_year(2019, &config).unwrap(), SourcePeriod::Decade(2010));
        assert_eq!(SourcePeriod::for_year(2020, &config).unwrap(), SourcePeriod::Year(2020));
        assert_eq!(SourcePeriod::for_year(2023, &config).unwrap(), SourcePeriod::Year(2023));
    }

    #[test]
    fn test_out_of_range_years() {
        let config = PipelineConfig::default();
        assert!(matches!(
            SourcePeriod::for_year(1969, &config),
            Err(DecesError::UnsupportedYear { year: 1969, .. })
        ));
        assert!(matches!(
            SourcePeriod::for_year(2024, &config),
            Err(DecesError::UnsupportedYear { year: 2024, .. })
        ));
    }

    #[test]
    fn test_archive_urls() {
        let config = PipelineConfig::default();
        assert_eq!(
            SourcePeriod::Decade(1970).archive_url(&config),
            "https://www.insee.fr/fr/statistiques/fichier/4769950/deces-1970-1979-csv.zip"
        );
        assert_eq!(
            SourcePeriod::Year(2021).archive_url(&config),
            "https://www.insee.fr/fr/statistiques/fichier/4190491/Deces_2021.zip"
        );

        let custom = PipelineConfig {
            yearly_base_url: "http://localhost:8080/files/".to_string(),
            ..PipelineConfig::default()
        };
        assert_eq!(
            SourcePeriod::Year(2022).archive_url(&custom),
            "http://localhost:8080/files/Deces_2022.zip"
        );
    }

    #[test]
    fn test_labels_and_dirs() {
        assert_eq!(SourcePeriod::Decade(1990).label(), "1990-1999");
        assert_eq!(SourcePeriod::Year(2020).to_string(), "2020");
        assert_eq!(
            SourcePeriod::Decade(2000).local_dir(Path::new("/data")),
            PathBuf::from("/data/2000-2009")
        );
    }

    #[test]
    fn test_contains() {
        let decade = SourcePeriod::Decade(1980);
        assert!(decade.contains(1980));
        assert!(decade.contains(1989));
        assert!(!decade.contains(1990));
        assert!(SourcePeriod::Year(2021).contains(2021));
        assert!(!SourcePeriod::Year(2021).contains(2022));
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("2021".parse::<SourcePeriod>().unwrap(), SourcePeriod::Year(2021));
        assert_eq!(
            "1970-1979".parse::<SourcePeriod>().unwrap(),
            SourcePeriod::Decade(1970)
        );
        assert!("1971-1980".parse::<SourcePeriod>().is_err());
        assert!("1970-1985".parse::<SourcePeriod>().is_err());
        assert!("seventies".parse::<SourcePeriod>().is_err());
    }
}
