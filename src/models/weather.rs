use super::enums::{DataFreshness, IrrigationLevel, RainfallPattern, RiskLevel, Season};
use super::soil::LocationSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeasonDates {
    pub start: &'static str,
    pub end: &'static str,
    pub sowing_window: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
    pub optimal_range: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct RiskChannel {
    pub level: RiskLevel,
    pub details: String,
}

/// Five weather risk channels plus human-readable summary lines.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct RiskAssessment {
    pub frost: RiskChannel,
    pub drought: RiskChannel,
    pub flood: RiskChannel,
    pub heat_stress: RiskChannel,
    pub disease_pressure: RiskChannel,
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IrrigationNeeds {
    pub level: IrrigationLevel,
    pub frequency: String,
    pub estimated_mm_per_week: u32,
    pub notes: String,
}

/// Weather-suitable crop (not a recommendation; the crop planner decides).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherSuitableCrop {
    pub crop: String,
    pub weather_suitability: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherResult {
    pub season: Season,
    pub season_dates: SeasonDates,
    pub temperature_range: TemperatureRange,
    pub rainfall_mm: f64,
    pub rainfall_pattern: RainfallPattern,
    pub humidity_percent: f64,
    pub suitability_score: u8,
    pub suitability_confidence: f64,
    pub risk_assessment: RiskAssessment,
    pub irrigation_needs: IrrigationNeeds,
    pub optimal_crops: Vec<WeatherSuitableCrop>,
    pub data_sources: Vec<String>,
    pub data_freshness: DataFreshness,
    pub location_context: LocationSnapshot,
}
