//! Projected reading of a single source file
//!
//! Only the columns listed in [`REQUIRED_COLUMNS`] and [`OPTIONAL_COLUMNS`] are
//! kept. Values are trimmed and empty values become `None`; no other
//! interpretation happens here.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::error::util::safe_open_file;
use crate::error::{DecesError, Result};

pub const BIRTH_DATE: &str = "datenaiss";
pub const DEATH_DATE: &str = "datedeces";
pub const SEX: &str = "sexe";
pub const BIRTH_COUNTRY: &str = "paysnaiss";
pub const BIRTH_PLACE: &str = "lieunaiss";
pub const DEATH_PLACE: &str = "lieudeces";

/// Columns every source file must have
pub const REQUIRED_COLUMNS: [&str; 3] = [BIRTH_DATE, DEATH_DATE, SEX];

/// Columns read when present
pub const OPTIONAL_COLUMNS: [&str; 3] = [BIRTH_COUNTRY, BIRTH_PLACE, DEATH_PLACE];

/// One projected row, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub sex: Option<String>,
    pub birth_country: Option<String>,
    pub birth_place: Option<String>,
    pub death_place: Option<String>,
}

/// Column positions of the projection within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Projection {
    birth_date: usize,
    death_date: usize,
    sex: usize,
    birth_country: Option<usize>,
    birth_place: Option<usize>,
    death_place: Option<usize>,
}

fn normalize_header(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

impl Projection {
    fn from_headers(headers: &ByteRecord, path: &Path) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let position = |column: &str| names.iter().position(|name| name == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| position(column).is_none())
            .map(|column| (*column).to_string())
            .collect();

        match (position(BIRTH_DATE), position(DEATH_DATE), position(SEX)) {
            (Some(birth_date), Some(death_date), Some(sex)) => Ok(Self {
                birth_date,
                death_date,
                sex,
                birth_country: position(BIRTH_COUNTRY),
                birth_place: position(BIRTH_PLACE),
                death_place: position(DEATH_PLACE),
            }),
            _ => Err(DecesError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            }),
        }
    }

    fn project(&self, record: &ByteRecord) -> RawRecord {
        let field = |idx: Option<usize>| -> Option<String> {
            let value = String::from_utf8_lossy(record.get(idx?)?);
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        RawRecord {
            birth_date: field(Some(self.birth_date)),
            death_date: field(Some(self.death_date)),
            sex: field(Some(self.sex)),
            birth_country: field(self.birth_country),
            birth_place: field(self.birth_place),
            death_place: field(self.death_place),
        }
    }
}

/// Read the projected columns of one delimited source file
///
/// Fails with [`DecesError::MissingColumns`] when a required column is absent
/// from the header. Rows shorter than the header yield `None` for the missing
/// trailing fields.
pub fn read_source_file(path: &Path, delimiter: u8) -> Result<Vec<RawRecord>> {
    let file = safe_open_file(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .byte_headers()
        .map_err(|e| DecesError::csv(path, e))?
        .clone();
    let projection = Projection::from_headers(&headers, path)?;

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while reader
        .read_byte_record(&mut record)
        .map_err(|e| DecesError::csv(path, e))?
    {
        rows.push(projection.project(&record));
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
