pub mod crop;
pub mod enums;
pub mod query;
pub mod soil;
pub mod weather;

pub use crop::{
    AlternativeCrop, CropEconomics, CropPlan, CropRecommendation, InputCostBreakdown, PlanRisk,
    PlanRiskKind, PlanningFactors, Precaution, PrecautionPriority, PriceRange, ProfitEstimate,
    RevenueEstimate, SchemeDetail, VarietyPick, YieldEstimate,
};
pub use enums::{
    AgentKind, DataFreshness, FallbackLevel, IrrigationLevel, RainfallPattern, RiskLevel, Season,
    SoilType, WaterRequirement,
};
pub use query::{
    AgentContext, AgentErrorEntry, DetectedIntent, FreshnessSummary, IntentAnalysis,
    OrchestratorResult, OverallFreshness, QueryRequest, UserProfile,
};
pub use soil::{
    LocationSnapshot, MicronutrientReading, NpkLevels, SoilCharacteristics, SoilResult,
};
pub use weather::{
    IrrigationNeeds, RiskAssessment, RiskChannel, SeasonDates, TemperatureRange, WeatherResult,
    WeatherSuitableCrop,
};
