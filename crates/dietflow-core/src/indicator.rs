//! Environmental indicators carried through to the last diagram tier

use serde::Serialize;
use std::fmt;

/// One of the four environmental impact measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Indicator {
    /// Greenhouse gas emissions
    Ghgs,
    /// Agricultural land use
    Land,
    /// Water use
    WaterUse,
    /// Biodiversity loss
    Biodiversity,
}

impl Indicator {
    /// All indicators in diagram order
    pub const ALL: [Indicator; 4] = [
        Indicator::Ghgs,
        Indicator::Land,
        Indicator::WaterUse,
        Indicator::Biodiversity,
    ];

    /// Normalized dataset column name
    pub fn column(self) -> &'static str {
        match self {
            Self::Ghgs => "mean_ghgs",
            Self::Land => "mean_land",
            Self::WaterUse => "mean_watuse",
            Self::Biodiversity => "mean_bio",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Ghgs => "GHG Emissions",
            Self::Land => "Land Use",
            Self::WaterUse => "Water Use",
            Self::Biodiversity => "Biodiversity Loss",
        }
    }

    /// Position within [`Indicator::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(indicator.index(), i);
        }
    }

    #[test]
    fn test_columns_and_labels() {
        let pairs: Vec<(&str, &str)> = Indicator::ALL
            .iter()
            .map(|i| (i.column(), i.label()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("mean_ghgs", "GHG Emissions"),
                ("mean_land", "Land Use"),
                ("mean_watuse", "Water Use"),
                ("mean_bio", "Biodiversity Loss"),
            ]
        );
    }
}
