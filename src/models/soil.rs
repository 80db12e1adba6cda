use super::enums::{DataFreshness, FallbackLevel, SoilType};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct NpkLevels {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl NpkLevels {
    pub const ZERO: Self = Self {
        nitrogen: 0.0,
        phosphorus: 0.0,
        potassium: 0.0,
    };

    pub fn any_present(&self) -> bool {
        self.nitrogen > 0.0 || self.phosphorus > 0.0 || self.potassium > 0.0
    }
}

/// A micronutrient reading is either a measured value or a reported status
/// (e.g. "deficient") with no number attached.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MicronutrientReading {
    Measured {
        value: f64,
        unit: String,
        source: String,
    },
    Status {
        status: String,
        source: String,
    },
}

/// Qualitative soil-behavior attributes keyed off the soil type.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SoilCharacteristics {
    pub drainage: &'static str,
    pub water_retention: &'static str,
    pub workability: &'static str,
    pub nutrient_retention: &'static str,
}

/// Location snapshot echoed in every agent result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct LocationSnapshot {
    pub pincode: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub fallback_level: Option<FallbackLevel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SoilResult {
    pub soil_type: SoilType,
    pub ph_level: f64,
    pub npk_levels: NpkLevels,
    /// Fraction of soil mass, 0..=1 (user inputs above 10 are read as
    /// percentages and divided down).
    pub organic_matter_percent: f64,
    pub micronutrients: BTreeMap<String, MicronutrientReading>,
    pub soil_characteristics: SoilCharacteristics,
    pub health_score: u8,
    pub health_confidence: f64,
    pub constraints: Vec<String>,
    pub recommendations: Vec<String>,
    pub data_sources: Vec<String>,
    pub data_freshness: DataFreshness,
    pub location_context: LocationSnapshot,
}
