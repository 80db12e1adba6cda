use serde::{Deserialize, Serialize};

/// Soil classes recognized by the extraction layer and the crop database.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Clay,
    Sandy,
    Loam,
    Silt,
    Peat,
    Chalk,
    BlackCotton,
    Red,
    Laterite,
    Alluvial,
    Unknown,
}

impl SoilType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clay => "clay",
            Self::Sandy => "sandy",
            Self::Loam => "loam",
            Self::Silt => "silt",
            Self::Peat => "peat",
            Self::Chalk => "chalk",
            Self::BlackCotton => "black_cotton",
            Self::Red => "red",
            Self::Laterite => "laterite",
            Self::Alluvial => "alluvial",
            Self::Unknown => "unknown",
        }
    }
}

/// Indian cropping seasons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
    Unknown,
}

impl Season {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kharif => "kharif",
            Self::Rabi => "rabi",
            Self::Zaid => "zaid",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Moderate and high levels drive variety picks and precautions.
    pub fn is_elevated(self) -> bool {
        self >= Self::Moderate
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// How specifically a location was resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackLevel {
    Live,
    LearnedPincode,
    LearnedDistrict,
    LearnedState,
    StaticPincode,
    StaticState,
    Default,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RainfallPattern {
    Scanty,
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaterRequirement {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl WaterRequirement {
    /// High and very-high crops are dropped when the farm has no irrigation.
    pub const fn needs_irrigation(self) -> bool {
        matches!(self, Self::High | Self::VeryHigh)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

/// Origin-age of a value carried through agent outputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataFreshness {
    UserProvided,
    Live,
    Historical,
    Estimated,
    Default,
    Unknown,
}

impl DataFreshness {
    pub const fn is_high_accuracy(self) -> bool {
        matches!(self, Self::UserProvided | Self::Live)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl IrrigationLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Soil,
    Weather,
    CropPlanning,
}

impl AgentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Soil => "soil",
            Self::Weather => "weather",
            Self::CropPlanning => "crop_planning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_order_by_severity() {
        assert!(RiskLevel::High > RiskLevel::Moderate);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
        assert!(RiskLevel::Moderate.is_elevated());
        assert!(!RiskLevel::Low.is_elevated());
    }

    #[test]
    fn soil_type_serializes_snake_case() {
        let json = serde_json::to_string(&SoilType::BlackCotton).unwrap_or_default();
        assert_eq!(json, r#""black_cotton""#);
    }

    #[test]
    fn water_requirement_irrigation_gate() {
        assert!(WaterRequirement::VeryHigh.needs_irrigation());
        assert!(WaterRequirement::High.needs_irrigation());
        assert!(!WaterRequirement::Moderate.needs_irrigation());
    }
}
