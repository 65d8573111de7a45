//! Fixed age ranges used for histogram-style aggregation
//!
//! Buckets are left-closed and right-open: `[0, 10)`, `[10, 20)`, ...,
//! `[90, 100)`, `[100, inf)`. An age of exactly 100 therefore falls in `100+`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of eleven fixed age ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    From0To10,
    From10To20,
    From20To30,
    From30To40,
    From40To50,
    From50To60,
    From60To70,
    From70To80,
    From80To90,
    From90To100,
    From100,
}

impl AgeBucket {
    /// All buckets in ascending order
    pub const ALL: [AgeBucket; 11] = [
        AgeBucket::From0To10,
        AgeBucket::From10To20,
        AgeBucket::From20To30,
        AgeBucket::From30To40,
        AgeBucket::From40To50,
        AgeBucket::From50To60,
        AgeBucket::From60To70,
        AgeBucket::From70To80,
        AgeBucket::From80To90,
        AgeBucket::From90To100,
        AgeBucket::From100,
    ];

    /// Bucket of an age in years; `None` for negative or non-finite ages
    #[must_use]
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        // Truncation is the floor for non-negative values
        let index = ((age / 10.0) as usize).min(Self::ALL.len() - 1);
        Some(Self::ALL[index])
    }

    /// Position of the bucket, 0 for `0-10` through 10 for `100+`
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive lower bound in years
    #[must_use]
    pub fn lower_bound(self) -> u32 {
        self.index() as u32 * 10
    }

    /// Exclusive upper bound in years, `None` for `100+`
    #[must_use]
    pub fn upper_bound(self) -> Option<u32> {
        match self {
            Self::From100 => None,
            other => Some(other.lower_bound() + 10),
        }
    }

    /// Display label ("0-10", ..., "90-100", "100+")
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::From0To10 => "0-10",
            Self::From10To20 => "10-20",
            Self::From20To30 => "20-30",
            Self::From30To40 => "30-40",
            Self::From40To50 => "40-50",
            Self::From50To60 => "50-60",
            Self::From60To70 => "60-70",
            Self::From70To80 => "70-80",
            Self::From80To90 => "80-90",
            Self::From90To100 => "90-100",
            Self::From100 => "100+",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_assignments() {
        assert_eq!(AgeBucket::from_age(0.0), Some(AgeBucket::From0To10));
        assert_eq!(AgeBucket::from_age(99.5), Some(AgeBucket::From90To100));
        assert_eq!(AgeBucket::from_age(150.0), Some(AgeBucket::From100));
    }

    #[test]
    fn test_boundaries_are_left_closed() {
        assert_eq!(AgeBucket::from_age(10.0), Some(AgeBucket::From10To20));
        assert_eq!(AgeBucket::from_age(9.999), Some(AgeBucket::From0To10));
        assert_eq!(AgeBucket::from_age(100.0), Some(AgeBucket::From100));
        assert_eq!(AgeBucket::from_age(99.999_999), Some(AgeBucket::From90To100));
    }

    #[test]
    fn test_invalid_ages() {
        assert_eq!(AgeBucket::from_age(-0.1), None);
        assert_eq!(AgeBucket::from_age(f64::NAN), None);
        assert_eq!(AgeBucket::from_age(f64::INFINITY), None);
    }

    #[test]
    fn test_labels_and_bounds() {
        let labels: Vec<_> = AgeBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec![
                "0-10", "10-20", "20-30", "30-40", "40-50", "50-60", "60-70", "70-80",
                "80-90", "90-100", "100+"
            ]
        );
        assert_eq!(AgeBucket::From90To100.lower_bound(), 90);
        assert_eq!(AgeBucket::From90To100.upper_bound(), Some(100));
        assert_eq!(AgeBucket::From100.upper_bound(), None);
        for (i, bucket) in AgeBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
    }
}
