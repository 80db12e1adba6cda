use super::enums::{RiskLevel, Season, WaterRequirement};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YieldEstimate {
    pub kg_per_ha: u32,
    pub range: String,
    pub quality_factor: &'static str,
    pub soil_health_impact: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InputCostBreakdown {
    pub seeds: f64,
    pub fertilizers: f64,
    pub irrigation: f64,
    pub pesticides: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueEstimate {
    pub at_market_min: f64,
    pub at_market_max: f64,
    pub at_msp: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfitEstimate {
    pub at_market_min: f64,
    pub at_market_max: f64,
    pub at_msp: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

/// Per-hectare economics scaled by the farm size.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CropEconomics {
    pub input_costs: InputCostBreakdown,
    pub expected_yield_kg: f64,
    pub revenue_estimate: RevenueEstimate,
    pub profit_estimate: ProfitEstimate,
    pub roi_percent: f64,
    pub msp_2024: Option<u32>,
    pub price_per_quintal: PriceRange,
    pub farm_size_ha: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VarietyPick {
    pub name: String,
    pub kind: &'static str,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchemeDetail {
    pub name: String,
    pub benefit: String,
    pub eligibility: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CropRecommendation {
    pub name: String,
    pub confidence: f64,
    pub reasoning: String,
    pub expected_yield: YieldEstimate,
    pub duration_months: u8,
    pub water_requirement: WaterRequirement,
    pub msp_available: bool,
    pub economics: CropEconomics,
    pub varieties: Vec<VarietyPick>,
    pub government_schemes: Vec<SchemeDetail>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlternativeCrop {
    pub crop: String,
    pub reason: String,
    pub kind: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanRiskKind {
    Soil,
    Weather,
    Disease,
    Market,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanRisk {
    #[serde(rename = "type")]
    pub kind: PlanRiskKind,
    pub severity: RiskLevel,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub affected_crops: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrecautionPriority {
    High,
    Medium,
    Low,
}

impl PrecautionPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Precaution {
    pub action: String,
    pub priority: PrecautionPriority,
    pub timing: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanningFactors {
    pub soil_health: u8,
    pub soil_confidence: f64,
    pub weather_suitability: u8,
    pub weather_confidence: f64,
    pub irrigation_available: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CropPlan {
    pub recommended_crops: Vec<CropRecommendation>,
    pub alternatives: Vec<AlternativeCrop>,
    pub risks: Vec<PlanRisk>,
    pub precautions: Vec<Precaution>,
    pub overall_confidence: f64,
    pub season: Season,
    pub planning_factors: PlanningFactors,
    pub data_sources: Vec<String>,
}
