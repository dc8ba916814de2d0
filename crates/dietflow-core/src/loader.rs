//! Dataset loading
//!
//! Reads the delimited results file, normalizes its header names and keeps
//! the rows that carry a sex, an age group and a diet code. Numeric columns
//! stay as text here; parsing them is the normalizer's job.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::InputConfig;
use crate::error::{Error, Result};
use crate::indicator::Indicator;

/// Column holding the participant count
pub const PARTICIPANTS_COLUMN: &str = "n_participants";

/// Columns that must be present after header normalization
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "sex",
    "age_group",
    "diet_group",
    PARTICIPANTS_COLUMN,
    "mean_ghgs",
    "mean_land",
    "mean_watuse",
    "mean_bio",
];

/// Cell values treated as missing (compared case-insensitively after trimming)
const MISSING_MARKERS: [&str; 7] = ["", "na", "n/a", "nan", "null", "none", "#n/a"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One dataset row with the fields the pipeline consumes
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line in the source file
    pub line: u64,
    /// Participant sex
    pub sex: String,
    /// Age bucket label
    pub age_group: String,
    /// Raw diet code
    pub diet_group: String,
    /// Participant count as written in the file
    pub n_participants: String,
    /// Indicator values as written, ordered like [`Indicator::ALL`]
    pub indicators: [String; 4],
}

/// Counters collected while loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read from the file
    pub rows_read: usize,
    /// Rows dropped for a missing sex, age group or diet code
    pub dropped_missing: usize,
}

/// Normalize a header name: trim, lowercase, whitespace runs become `_`
pub fn normalize_column_name(name: &str) -> String {
    WHITESPACE
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// Whether a cell holds one of the usual missing-value markers
pub fn is_missing(value: &str) -> bool {
    let value = value.trim();
    MISSING_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Positions of the required columns within a row
#[derive(Debug, Clone)]
struct ColumnIndex {
    sex: usize,
    age_group: usize,
    diet_group: usize,
    n_participants: usize,
    indicators: [usize; 4],
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> std::result::Result<Self, Vec<&'static str>> {
        let names: Vec<String> = headers.iter().map(normalize_column_name).collect();
        let position = |column: &str| names.iter().position(|name| name == column);

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| position(column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let find = |column: &str| position(column).unwrap_or_default();
        Ok(Self {
            sex: find("sex"),
            age_group: find("age_group"),
            diet_group: find("diet_group"),
            n_participants: find(PARTICIPANTS_COLUMN),
            indicators: Indicator::ALL.map(|indicator| find(indicator.column())),
        })
    }

    fn extract(&self, row: &csv::StringRecord, line: u64) -> Option<RawRecord> {
        let field = |idx: usize| row.get(idx).unwrap_or("").to_string();
        let required = |idx: usize| Some(field(idx)).filter(|v| !is_missing(v));

        let (Some(sex), Some(age_group), Some(diet_group)) = (
            required(self.sex),
            required(self.age_group),
            required(self.diet_group),
        ) else {
            tracing::debug!(line, "dropping record with missing sex, age group or diet");
            return None;
        };

        Some(RawRecord {
            line,
            sex,
            age_group,
            diet_group,
            n_participants: field(self.n_participants),
            indicators: self.indicators.map(&field),
        })
    }
}

/// Load and clean the dataset described by `input`.
///
/// The file handle is dropped before this returns, whether or not parsing
/// succeeded. Fails with [`Error::DataSource`] when the file cannot be read,
/// is malformed or lacks a required column, and with [`Error::EmptyResult`]
/// when no row survives the missing-field filter.
pub fn load_records(input: &InputConfig) -> Result<(Vec<RawRecord>, LoadReport)> {
    let path = input.path.as_str();
    let delimiter = u8::try_from(input.delimiter).map_err(|_| Error::ConfigInvalid {
        message: format!("delimiter '{}' is not a single byte", input.delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::data_source(path, e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::data_source(path, e.to_string()))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers).map_err(|missing| {
        Error::data_source(
            path,
            format!("missing required column(s): {}", missing.join(", ")),
        )
    })?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| Error::data_source(path, e.to_string()))?;
        report.rows_read += 1;
        let line = row.position().map_or(0, |p| p.line());
        match columns.extract(&row, line) {
            Some(record) => records.push(record),
            None => report.dropped_missing += 1,
        }
    }

    if records.is_empty() {
        return Err(Error::EmptyResult {
            stage: "missing-value filtering".to_string(),
        });
    }

    tracing::info!(
        "Loaded {} records from {} ({} dropped for missing fields)",
        records.len(),
        path,
        report.dropped_missing
    );
    Ok((records, report))
}
