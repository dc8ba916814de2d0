//! Diet taxonomy and classification
//!
//! Raw diet codes from the dataset map onto a closed set of six display
//! categories. Any other code is unclassifiable and its record is dropped.

use phf::phf_map;
use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};
use crate::loader::RawRecord;

/// Diet category shown in the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DietCategory {
    /// No animal products
    Vegan,
    /// No meat or fish
    Vegetarian,
    /// Fish but no meat
    FishEater,
    /// Under 50g of meat per day
    LowMeat,
    /// 50 to 99g of meat per day
    MediumMeat,
    /// 100g or more of meat per day
    HighMeat,
}

static DIET_CODES: phf::Map<&'static str, DietCategory> = phf_map! {
    "vegan" => DietCategory::Vegan,
    "veggie" => DietCategory::Vegetarian,
    "fish" => DietCategory::FishEater,
    "meat" => DietCategory::LowMeat,
    "meat50" => DietCategory::MediumMeat,
    "meat100" => DietCategory::HighMeat,
};

impl DietCategory {
    /// All categories in diagram order
    pub const ALL: [DietCategory; 6] = [
        DietCategory::Vegan,
        DietCategory::Vegetarian,
        DietCategory::FishEater,
        DietCategory::LowMeat,
        DietCategory::MediumMeat,
        DietCategory::HighMeat,
    ];

    /// Classify a raw diet code; codes are matched exactly
    pub fn classify(code: &str) -> Option<Self> {
        DIET_CODES.get(code).copied()
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Vegan => "Vegan",
            Self::Vegetarian => "Vegetarian",
            Self::FishEater => "Fish-eater",
            Self::LowMeat => "Low Meat (<50g)",
            Self::MediumMeat => "Medium Meat (50–99g)",
            Self::HighMeat => "High Meat (100g+)",
        }
    }

    /// Raw dataset code
    pub fn code(self) -> &'static str {
        match self {
            Self::Vegan => "vegan",
            Self::Vegetarian => "veggie",
            Self::FishEater => "fish",
            Self::LowMeat => "meat",
            Self::MediumMeat => "meat50",
            Self::HighMeat => "meat100",
        }
    }
}

impl fmt::Display for DietCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A loaded record with its diet category attached
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    /// The record as loaded
    pub raw: RawRecord,
    /// Category derived from `raw.diet_group`
    pub diet_level: DietCategory,
}

/// Classify every record, dropping unclassifiable ones.
///
/// Returns the kept records and the number dropped. Fails with
/// [`Error::EmptyResult`] when nothing survives.
pub fn classify_records(records: Vec<RawRecord>) -> Result<(Vec<ClassifiedRecord>, usize)> {
    let total = records.len();
    let classified: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter_map(|raw| match DietCategory::classify(&raw.diet_group) {
            Some(diet_level) => Some(ClassifiedRecord { raw, diet_level }),
            None => {
                tracing::debug!(
                    line = raw.line,
                    diet_group = %raw.diet_group,
                    "dropping record with unclassifiable diet code"
                );
                None
            }
        })
        .collect();

    let dropped = total - classified.len();
    if classified.is_empty() {
        return Err(Error::EmptyResult {
            stage: "diet classification".to_string(),
        });
    }

    tracing::info!(
        "Classified {} records ({} unclassifiable dropped)",
        classified.len(),
        dropped
    );
    Ok((classified, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::raw_record;
    use rstest::rstest;

    #[rstest]
    #[case("vegan", DietCategory::Vegan, "Vegan")]
    #[case("veggie", DietCategory::Vegetarian, "Vegetarian")]
    #[case("fish", DietCategory::FishEater, "Fish-eater")]
    #[case("meat", DietCategory::LowMeat, "Low Meat (<50g)")]
    #[case("meat50", DietCategory::MediumMeat, "Medium Meat (50–99g)")]
    #[case("meat100", DietCategory::HighMeat, "High Meat (100g+)")]
    fn test_classify_known_codes(
        #[case] code: &str,
        #[case] expected: DietCategory,
        #[case] label: &str,
    ) {
        let category = DietCategory::classify(code).unwrap();
        assert_eq!(category, expected);
        assert_eq!(category.label(), label);
        assert_eq!(category.code(), code);
    }

    #[rstest]
    #[case("")]
    #[case("Vegan")]
    #[case("meat25")]
    #[case(" fish")]
    #[case("pescatarian")]
    fn test_classify_unknown_codes(#[case] code: &str) {
        assert!(DietCategory::classify(code).is_none());
    }

    #[test]
    fn test_all_is_in_display_order_and_complete() {
        let labels: Vec<&str> = DietCategory::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Vegan",
                "Vegetarian",
                "Fish-eater",
                "Low Meat (<50g)",
                "Medium Meat (50–99g)",
                "High Meat (100g+)",
            ]
        );
        assert_eq!(DIET_CODES.len(), DietCategory::ALL.len());
    }

    #[test]
    fn test_classify_records_drops_unknown() {
        let records = vec![
            raw_record(2, "female", "20-29", "vegan"),
            raw_record(3, "male", "30-39", "carnivore"),
            raw_record(4, "male", "40-49", "meat50"),
        ];

        let (kept, dropped) = classify_records(records).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].diet_level, DietCategory::Vegan);
        assert_eq!(kept[1].diet_level, DietCategory::MediumMeat);
        assert_eq!(kept[1].raw.line, 4);
    }

    #[test]
    fn test_classify_records_all_unknown_is_empty_result() {
        let records = vec![
            raw_record(2, "female", "20-29", "keto"),
            raw_record(3, "male", "30-39", "paleo"),
        ];
        assert!(matches!(
            classify_records(records),
            Err(Error::EmptyResult { .. })
        ));
    }
}
