//! Min-max normalization of the numeric columns
//!
//! Each indicator column and the participant count are rescaled to `[0, 1]`
//! independently, using the minimum and maximum observed across all retained
//! records. A column whose values are all equal has no spread to rescale;
//! every value in it maps to [`DEGENERATE_VALUE`] so the diagram still gets a
//! valid, zero-width link instead of a NaN.

use serde::Serialize;

use crate::diet::{ClassifiedRecord, DietCategory};
use crate::error::{Error, Result};
use crate::indicator::Indicator;
use crate::loader::{PARTICIPANTS_COLUMN, is_missing};

/// Normalized value assigned to every entry of an all-equal column
pub const DEGENERATE_VALUE: f64 = 0.0;

/// Observed range of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl ColumnStats {
    /// Fit over a non-empty sequence of finite values
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| {
            Some(match acc {
                None => Self { min: v, max: v },
                Some(Self { min, max }) => Self {
                    min: min.min(v),
                    max: max.max(v),
                },
            })
        })
    }

    /// Whether the column has no spread
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Rescale `value` into `[0, 1]`
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            DEGENERATE_VALUE
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }
}

/// Numeric fields as parsed from the dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measures {
    /// Participant count
    pub n_participants: u64,
    /// Indicator values, ordered like [`Indicator::ALL`]
    pub indicators: [f64; 4],
}

/// Numeric fields after rescaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMeasures {
    /// Rescaled participant count
    pub participants: f64,
    /// Rescaled indicator values, ordered like [`Indicator::ALL`]
    pub indicators: [f64; 4],
}

/// A fully prepared record: classified, parsed and normalized
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line in the source file
    pub line: u64,
    /// Participant sex
    pub sex: String,
    /// Age bucket label
    pub age_group: String,
    /// Raw diet code
    pub diet_group: String,
    /// Derived diet category
    pub diet_level: DietCategory,
    /// Values as read
    pub raw: Measures,
    /// Values rescaled to `[0, 1]`
    pub normalized: NormalizedMeasures,
}

impl Record {
    /// Normalized value of one indicator
    pub fn indicator(&self, indicator: Indicator) -> f64 {
        self.normalized.indicators[indicator.index()]
    }
}

/// Ranges of every normalized column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationStats {
    /// Participant count range
    pub participants: ColumnStats,
    /// Indicator ranges, ordered like [`Indicator::ALL`]
    pub indicators: [ColumnStats; 4],
}

/// Parse and normalize the numeric columns of every record.
///
/// Fails with [`Error::Normalization`] on a missing, non-numeric or
/// non-finite value, and with [`Error::EmptyResult`] if given no records.
pub fn normalize_records(
    records: Vec<ClassifiedRecord>,
) -> Result<(Vec<Record>, NormalizationStats)> {
    let parsed = records
        .into_iter()
        .map(|record| {
            let measures = parse_measures(&record)?;
            Ok((record, measures))
        })
        .collect::<Result<Vec<_>>>()?;

    let empty = || Error::EmptyResult {
        stage: "normalization".to_string(),
    };
    let participants = ColumnStats::fit(parsed.iter().map(|(_, m)| m.n_participants as f64))
        .ok_or_else(empty)?;
    let mut indicators = [participants; 4];
    for indicator in Indicator::ALL {
        let i = indicator.index();
        indicators[i] =
            ColumnStats::fit(parsed.iter().map(|(_, m)| m.indicators[i])).ok_or_else(empty)?;
    }
    let stats = NormalizationStats {
        participants,
        indicators,
    };

    if stats.participants.is_degenerate() {
        tracing::warn!(
            column = PARTICIPANTS_COLUMN,
            value = stats.participants.min,
            "column has a single value; normalizing to {}",
            DEGENERATE_VALUE
        );
    }
    for indicator in Indicator::ALL {
        let column = stats.indicators[indicator.index()];
        if column.is_degenerate() {
            tracing::warn!(
                column = indicator.column(),
                value = column.min,
                "column has a single value; normalizing to {}",
                DEGENERATE_VALUE
            );
        }
    }

    let normalized: Vec<Record> = parsed
        .into_iter()
        .map(|(record, raw)| {
            let normalized = NormalizedMeasures {
                participants: stats.participants.scale(raw.n_participants as f64),
                indicators: std::array::from_fn(|i| stats.indicators[i].scale(raw.indicators[i])),
            };
            let ClassifiedRecord { raw: loaded, diet_level } = record;
            Record {
                line: loaded.line,
                sex: loaded.sex,
                age_group: loaded.age_group,
                diet_group: loaded.diet_group,
                diet_level,
                raw,
                normalized,
            }
        })
        .collect();

    tracing::info!("Normalized {} records", normalized.len());
    Ok((normalized, stats))
}

fn parse_measures(record: &ClassifiedRecord) -> Result<Measures> {
    let raw = &record.raw;
    let n_participants = parse_participants(&raw.n_participants, raw.line)?;
    let mut indicators = [0.0; 4];
    for indicator in Indicator::ALL {
        indicators[indicator.index()] =
            parse_indicator(&raw.indicators[indicator.index()], indicator.column(), raw.line)?;
    }
    Ok(Measures {
        n_participants,
        indicators,
    })
}

fn parse_participants(value: &str, line: u64) -> Result<u64> {
    let invalid = |message: String| Error::Normalization {
        column: PARTICIPANTS_COLUMN.to_string(),
        message,
    };
    if is_missing(value) {
        return Err(invalid(format!("missing value on line {}", line)));
    }
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(invalid(format!(
            "'{}' on line {} is not a positive integer",
            value, line
        ))),
        Ok(n) => Ok(n),
    }
}

fn parse_indicator(value: &str, column: &str, line: u64) -> Result<f64> {
    let invalid = |message: String| Error::Normalization {
        column: column.to_string(),
        message,
    };
    if is_missing(value) {
        return Err(invalid(format!("missing value on line {}", line)));
    }
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' on line {} is not a number", value, line)))?;
    if !parsed.is_finite() {
        return Err(invalid(format!(
            "'{}' on line {} is not a finite number",
            value, line
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RawRecord;
    use rstest::rstest;

    fn classified(line: u64, n: &str, indicators: [&str; 4]) -> ClassifiedRecord {
        ClassifiedRecord {
            raw: RawRecord {
                line,
                sex: "female".to_string(),
                age_group: "20-29".to_string(),
                diet_group: "vegan".to_string(),
                n_participants: n.to_string(),
                indicators: indicators.map(String::from),
            },
            diet_level: DietCategory::Vegan,
        }
    }

    #[test]
    fn test_two_point_min_max() {
        let records = vec![
            classified(2, "100", ["10", "5", "3", "1"]),
            classified(3, "200", ["50", "25", "15", "5"]),
        ];

        let (normalized, stats) = normalize_records(records).unwrap();
        assert_eq!(normalized[0].normalized.indicators, [0.0; 4]);
        assert_eq!(normalized[1].normalized.indicators, [1.0; 4]);
        assert_eq!(normalized[0].normalized.participants, 0.0);
        assert_eq!(normalized[1].normalized.participants, 1.0);
        assert_eq!(normalized[1].raw.indicators, [50.0, 25.0, 15.0, 5.0]);
        assert_eq!(normalized[1].raw.n_participants, 200);
        assert_eq!(stats.indicators[0], ColumnStats { min: 10.0, max: 50.0 });
    }

    #[test]
    fn test_values_lie_in_unit_range() {
        let records = vec![
            classified(2, "37", ["3.2", "-1", "0", "8"]),
            classified(3, "5", ["1.1", "4", "2.5", "8"]),
            classified(4, "120", ["9.75", "0.5", "1", "8"]),
            classified(5, "64", ["4", "2", "7", "8"]),
        ];

        let (normalized, _) = normalize_records(records).unwrap();
        for record in &normalized {
            assert!((0.0..=1.0).contains(&record.normalized.participants));
            for value in record.normalized.indicators {
                assert!((0.0..=1.0).contains(&value), "{} out of range", value);
            }
        }
        assert_eq!(normalized[1].normalized.participants, 0.0);
        assert_eq!(normalized[2].normalized.participants, 1.0);
        assert_eq!(normalized[0].indicator(Indicator::Land), 0.0);
        assert_eq!(normalized[1].indicator(Indicator::Land), 1.0);
        assert_eq!(normalized[1].indicator(Indicator::Ghgs), 0.0);
        assert_eq!(normalized[2].indicator(Indicator::Ghgs), 1.0);
    }

    #[test]
    fn test_degenerate_column_maps_to_constant() {
        let records = vec![
            classified(2, "50", ["1", "2", "3", "4"]),
            classified(3, "50", ["2", "2", "3", "4"]),
        ];

        let (normalized, stats) = normalize_records(records).unwrap();
        assert!(stats.participants.is_degenerate());
        for record in &normalized {
            assert_eq!(record.normalized.participants, DEGENERATE_VALUE);
            assert_eq!(record.indicator(Indicator::Land), DEGENERATE_VALUE);
            assert_eq!(record.indicator(Indicator::Biodiversity), DEGENERATE_VALUE);
            assert!(!record.indicator(Indicator::WaterUse).is_nan());
        }
        assert_eq!(normalized[1].indicator(Indicator::Ghgs), 1.0);
    }

    #[test]
    fn test_single_record_is_fully_degenerate() {
        let (normalized, _) = normalize_records(vec![classified(2, "9", ["1", "2", "3", "4"])])
            .unwrap();
        assert_eq!(normalized[0].normalized.indicators, [DEGENERATE_VALUE; 4]);
        assert_eq!(normalized[0].normalized.participants, DEGENERATE_VALUE);
    }

    #[rstest]
    #[case("abc", ["1", "1", "1", "1"], "n_participants")]
    #[case("0", ["1", "1", "1", "1"], "n_participants")]
    #[case("-3", ["1", "1", "1", "1"], "n_participants")]
    #[case("", ["1", "1", "1", "1"], "n_participants")]
    #[case("10", ["x", "1", "1", "1"], "mean_ghgs")]
    #[case("10", ["1", "", "1", "1"], "mean_land")]
    #[case("10", ["1", "1", "inf", "1"], "mean_watuse")]
    #[case("10", ["1", "1", "1", "NaN"], "mean_bio")]
    fn test_bad_values_are_normalization_errors(
        #[case] n: &str,
        #[case] indicators: [&str; 4],
        #[case] column: &str,
    ) {
        let records = vec![classified(7, n, indicators), classified(8, "1", ["1"; 4])];
        match normalize_records(records) {
            Err(Error::Normalization { column: c, message }) => {
                assert_eq!(c, column);
                assert!(message.contains("line 7"), "{}", message);
            }
            other => panic!("Expected normalization error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        assert!(matches!(
            normalize_records(Vec::new()),
            Err(Error::EmptyResult { .. })
        ));
    }

    #[test]
    fn test_column_stats_fit() {
        assert_eq!(ColumnStats::fit(Vec::<f64>::new()), None);
        let stats = ColumnStats::fit([3.0, -2.0, 7.5]).unwrap();
        assert_eq!(stats, ColumnStats { min: -2.0, max: 7.5 });
        assert_eq!(stats.scale(-2.0), 0.0);
        assert_eq!(stats.scale(7.5), 1.0);
    }
}
