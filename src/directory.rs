use std::{io::Read, path::Path, time::Instant};

use serde::Serialize;

use crate::semantic::{is_missing, normalize_candidate};

pub const NAME_COLUMN: &str = "NAME";
pub const NUMBER_COLUMN: &str = "NUMBER";
pub const EMAIL_COLUMN: &str = "EMAIL";
pub const PROFESSION_COLUMN: &str = "PROFESSION";

/// One row of the professionals table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalRecord {
    pub name: String,
    /// Stored without the local leading zero, see `display_phone()`.
    pub phone_number: String,
    pub email: String,
    /// Empty when the source cell is missing.
    pub profession: String,
}

impl ProfessionalRecord {
    /// Phone number as dialed locally: the dataset drops the leading zero.
    pub fn display_phone(&self) -> String {
        if self.phone_number.is_empty() {
            return String::new();
        }
        format!("0{}", self.phone_number)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    #[error("failed to read dataset {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column {0:?}")]
    MissingColumn(&'static str),
}

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    number: usize,
    email: usize,
    profession: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DirectoryError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(DirectoryError::MissingColumn(column))
        };

        Ok(Columns {
            name: find(NAME_COLUMN)?,
            number: find(NUMBER_COLUMN)?,
            email: find(EMAIL_COLUMN)?,
            profession: find(PROFESSION_COLUMN)?,
        })
    }
}

/// The full, read-only set of professionals, in file order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<ProfessionalRecord>,
}

impl Directory {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let now = Instant::now();

        let reader = Self::reader_builder()
            .from_path(path)
            .map_err(|source| DirectoryError::Open {
                path: path.display().to_string(),
                source,
            })?;
        let directory = Self::from_csv(reader)?;

        log::debug!(
            "took {}ms to read {} professionals from {}",
            now.elapsed().as_micros() as f64 / 1000.0,
            directory.len(),
            path.display()
        );

        Ok(directory)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        Self::from_csv(Self::reader_builder().from_reader(reader))
    }

    /// Rows may stop early; absent trailing cells read as empty.
    fn reader_builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.flexible(true);
        builder
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DirectoryError> {
        let columns = Columns::resolve(reader.headers()?)?;

        let mut records = vec![];
        for row in reader.records() {
            let row = row?;
            let field = |idx: usize| row.get(idx).unwrap_or_default();

            records.push(ProfessionalRecord {
                name: field(columns.name).to_string(),
                phone_number: normalize_phone(field(columns.number)),
                email: field(columns.email).to_string(),
                profession: normalize_candidate(row.get(columns.profession)),
            });
        }

        Ok(Directory { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProfessionalRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[ProfessionalRecord] {
        &self.records
    }

    /// Profession labels in record order; index `i` belongs to record `i`.
    pub fn profession_labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.profession.clone()).collect()
    }
}

/// Numbers exported through spreadsheets may come back as floats (`8031234567.0`).
fn normalize_phone(raw: &str) -> String {
    let raw = raw.trim();
    if is_missing(raw) {
        return String::new();
    }

    match raw.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => raw.to_string(),
    }
}
