use super::crop::CropPlan;
use super::enums::{AgentKind, DataFreshness};
use super::soil::SoilResult;
use super::weather::WeatherResult;
use crate::location::ResolvedLocation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Farm details a caller may attach to a query.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserProfile {
    pub farm_size_ha: Option<f64>,
    pub irrigation_available: Option<bool>,
    pub previous_crop: Option<String>,
    pub budget: Option<f64>,
}

/// Inbound advisory query. Only `query` is required.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryRequest {
    #[serde(default, alias = "question")]
    pub query: String,
    pub pincode: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub language: Option<String>,
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub previous_queries: Vec<String>,
}

/// Shared context handed to every agent after location enrichment.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub pincode: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub language: String,
    pub farm_size_ha: f64,
    pub irrigation_available: bool,
    pub previous_crop: Option<String>,
    pub budget: Option<f64>,
    pub previous_queries: Vec<String>,
    pub location: Option<ResolvedLocation>,
    /// Single clock stamp per request so season derivation is deterministic.
    pub now: DateTime<Utc>,
}

impl AgentContext {
    pub fn from_request(request: &QueryRequest, now: DateTime<Utc>) -> Self {
        let profile = request.user_profile.clone().unwrap_or_default();
        Self {
            pincode: request.pincode.clone(),
            district: request.district.clone(),
            state: request.state.clone(),
            language: request.language.clone().unwrap_or_else(|| "en".to_string()),
            farm_size_ha: profile.farm_size_ha.unwrap_or(1.0),
            irrigation_available: profile.irrigation_available.unwrap_or(true),
            previous_crop: profile.previous_crop,
            budget: profile.budget,
            previous_queries: request.previous_queries.clone(),
            location: None,
            now,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetectedIntent {
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntentAnalysis {
    pub agents: Vec<AgentKind>,
    pub confidence: f64,
    pub detected_intents: BTreeMap<String, DetectedIntent>,
    pub is_default_selection: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentErrorEntry {
    pub agent: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallFreshness {
    HighAccuracy,
    EstimatedFromHistorical,
    MixedSources,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FreshnessSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil: Option<DataFreshness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<DataFreshness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_economics: Option<DataFreshness>,
    pub overall: OverallFreshness,
}

/// Aggregated multi-agent answer, handed to the external LLM renderer.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorResult {
    pub query: String,
    pub intent_analysis: IntentAnalysis,
    pub agents_invoked: Vec<AgentKind>,
    pub soil_result: Option<SoilResult>,
    pub weather_result: Option<WeatherResult>,
    pub crop_plan: Option<CropPlan>,
    pub agent_errors: Vec<AgentErrorEntry>,
    pub overall_confidence: f64,
    pub data_sources: Vec<String>,
    pub data_freshness_summary: FreshnessSummary,
    pub llm_prompt_input: String,
}
