//! Orchestration: route the query to agents, fan out soil and weather in
//! parallel, run crop planning over their (or surrogate) outputs, and
//! aggregate confidence, freshness, and the LLM prompt.
//!
//! The orchestrator never errors out: every failure is folded into the
//! result as an `agent_errors` entry or, at worst, a minimal fallback
//! result.

use super::{crop_planning, intent, prompt, round2, soil, weather};
use crate::config::Config;
use crate::knowledge::soil_characteristics;
use crate::location;
use crate::models::{
    AgentContext, AgentErrorEntry, AgentKind, CropPlan, DataFreshness, FreshnessSummary,
    IntentAnalysis, IrrigationLevel, IrrigationNeeds, LocationSnapshot, NpkLevels,
    OrchestratorResult, OverallFreshness, QueryRequest, RiskAssessment, Season, SeasonDates,
    SoilResult, SoilType, TemperatureRange, WeatherResult,
};
use crate::retrieval::{retrieval_from_config, DocumentRetrieval};
use crate::store::{store_from_env, LearningStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Composition root: owns the shared HTTP client, the learning store, and
/// the retrieval adapter, and drives the agent pipeline per request.
pub struct Orchestrator {
    config: Config,
    store: Arc<dyn LearningStore>,
    retrieval: Arc<dyn DocumentRetrieval>,
    http: reqwest::Client,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        config: Config,
        store: Arc<dyn LearningStore>,
        retrieval: Arc<dyn DocumentRetrieval>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            config,
            store,
            retrieval,
            http,
        }
    }

    pub async fn from_env() -> Self {
        let config = Config::from_env();
        let store = store_from_env(&config).await;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        let retrieval = retrieval_from_config(&http, &config);

        Self {
            config,
            store,
            retrieval,
            http,
        }
    }

    pub fn store(&self) -> &Arc<dyn LearningStore> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline. Always returns a result; partial failures
    /// surface through `agent_errors` and reduced confidence.
    pub async fn handle(&self, request: &QueryRequest) -> OrchestratorResult {
        let query = request.query.clone();
        info!(query = query.as_str(), "Orchestrator processing query");

        let intent_analysis = intent::analyze(&query, &request.previous_queries);
        info!(
            agents = ?intent_analysis.agents,
            confidence = intent_analysis.confidence,
            "Intent analysis"
        );

        let mut ctx = AgentContext::from_request(request, chrono::Utc::now());
        self.enrich_location(&mut ctx).await;

        let agents = &intent_analysis.agents;
        let mut agent_errors: Vec<AgentErrorEntry> = Vec::new();

        // Soil and weather are independent; run them concurrently.
        let soil_future = async {
            if agents.contains(&AgentKind::Soil) {
                Some(soil::analyze(&query, &ctx, self.store.as_ref(), self.retrieval.as_ref()).await)
            } else {
                None
            }
        };
        let weather_future = async {
            if agents.contains(&AgentKind::Weather) {
                Some(
                    weather::analyze(&query, &ctx, self.store.as_ref(), &self.http, &self.config)
                        .await,
                )
            } else {
                None
            }
        };
        let (soil_outcome, weather_outcome) = tokio::join!(soil_future, weather_future);

        let soil_result = collect_outcome(soil_outcome, AgentKind::Soil, &mut agent_errors);
        let weather_result = collect_outcome(weather_outcome, AgentKind::Weather, &mut agent_errors);

        // Crop planning happens-after both, consuming surrogates for any
        // analyzer that did not produce a result.
        let crop_plan = if agents.contains(&AgentKind::CropPlanning) {
            let soil_input = soil_result.clone().unwrap_or_else(default_soil_result);
            let weather_input = weather_result
                .clone()
                .unwrap_or_else(default_weather_result);

            match crop_planning::plan(
                &soil_input,
                &weather_input,
                &query,
                &ctx,
                self.retrieval.as_ref(),
            )
            .await
            {
                Ok(plan) => Some(plan),
                Err(err) => {
                    error!(error = %err, "Crop planning agent failed");
                    agent_errors.push(AgentErrorEntry {
                        agent: AgentKind::CropPlanning.as_str().to_string(),
                        error: err.to_string(),
                    });
                    None
                }
            }
        } else {
            None
        };

        let overall_confidence = overall_confidence(
            soil_result.as_ref(),
            weather_result.as_ref(),
            crop_plan.as_ref(),
            &intent_analysis,
            agent_errors.len(),
        );

        let data_freshness_summary =
            summarize_freshness(soil_result.as_ref(), weather_result.as_ref(), crop_plan.as_ref());

        let data_sources = collect_data_sources(
            soil_result.as_ref(),
            weather_result.as_ref(),
            crop_plan.as_ref(),
        );

        let llm_prompt_input = prompt::build_llm_prompt(
            &query,
            &ctx,
            soil_result.as_ref(),
            weather_result.as_ref(),
            crop_plan.as_ref(),
            overall_confidence,
            &data_sources,
            &agent_errors,
        );

        info!(
            confidence = overall_confidence,
            errors = agent_errors.len(),
            "Orchestrator completed"
        );

        OrchestratorResult {
            query,
            agents_invoked: intent_analysis.agents.clone(),
            intent_analysis,
            soil_result,
            weather_result,
            crop_plan,
            agent_errors,
            overall_confidence,
            data_sources,
            data_freshness_summary,
            llm_prompt_input,
        }
    }

    /// Resolve coordinates once per request and back-fill state/district
    /// the caller did not supply.
    async fn enrich_location(&self, ctx: &mut AgentContext) {
        let resolved = location::resolve(
            &self.http,
            self.store.as_ref(),
            &self.config,
            ctx.pincode.as_deref(),
            ctx.state.as_deref(),
        )
        .await;

        if ctx.state.is_none() {
            ctx.state.clone_from(&resolved.state);
        }
        if ctx.district.is_none() {
            ctx.district.clone_from(&resolved.district);
        }

        // A previously learned location payload can still fill the gaps.
        if ctx.state.is_none() || ctx.district.is_none() {
            if let Some(pincode) = ctx.pincode.as_deref() {
                if let Some(learned) = self.store.get_location(pincode).await {
                    if ctx.state.is_none() && !learned.state.is_empty() {
                        ctx.state = Some(learned.state);
                    }
                    if ctx.district.is_none() && !learned.district.is_empty() {
                        ctx.district = Some(learned.district);
                    }
                }
            }
        }

        ctx.location = Some(resolved);
    }
}

fn collect_outcome<T>(
    outcome: Option<Result<T, crate::error::AgentError>>,
    agent: AgentKind,
    agent_errors: &mut Vec<AgentErrorEntry>,
) -> Option<T> {
    match outcome {
        Some(Ok(result)) => Some(result),
        Some(Err(err)) => {
            error!(agent = agent.as_str(), error = %err, "Agent failed");
            agent_errors.push(AgentErrorEntry {
                agent: agent.as_str().to_string(),
                error: err.to_string(),
            });
            None
        }
        None => None,
    }
}

/// Build a minimal fallback result for a failure outside the agent
/// pipeline: no agents, one orchestrator error, zero confidence.
pub fn failure_result(query: &str, error: &str) -> OrchestratorResult {
    OrchestratorResult {
        query: query.to_string(),
        intent_analysis: IntentAnalysis {
            agents: Vec::new(),
            confidence: 0.0,
            detected_intents: std::collections::BTreeMap::new(),
            is_default_selection: false,
        },
        agents_invoked: Vec::new(),
        soil_result: None,
        weather_result: None,
        crop_plan: None,
        agent_errors: vec![AgentErrorEntry {
            agent: "orchestrator".to_string(),
            error: error.to_string(),
        }],
        overall_confidence: 0.0,
        data_sources: Vec::new(),
        data_freshness_summary: FreshnessSummary {
            soil: None,
            weather: None,
            crop_economics: None,
            overall: OverallFreshness::MixedSources,
        },
        llm_prompt_input: prompt::fallback_prompt(query),
    }
}

/// Weighted confidence over the agents that produced output (soil 0.25,
/// weather 0.25, crop plan 0.35, intent 0.15), penalized per error and
/// clamped to [0.1, 1.0].
fn overall_confidence(
    soil: Option<&SoilResult>,
    weather: Option<&WeatherResult>,
    crop_plan: Option<&CropPlan>,
    intent_analysis: &IntentAnalysis,
    error_count: usize,
) -> f64 {
    let mut confidences = Vec::new();
    let mut weights = Vec::new();

    if let Some(soil) = soil {
        confidences.push(soil.health_confidence);
        weights.push(0.25);
    }
    if let Some(weather) = weather {
        confidences.push(weather.suitability_confidence);
        weights.push(0.25);
    }
    if let Some(plan) = crop_plan {
        confidences.push(plan.overall_confidence);
        weights.push(0.35);
    }
    confidences.push(intent_analysis.confidence);
    weights.push(0.15);

    let total_weight: f64 = weights.iter().sum();
    let weighted_sum: f64 = confidences
        .iter()
        .zip(&weights)
        .map(|(confidence, weight)| confidence * weight)
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let penalty = 0.1 * error_count as f64;
    round2(((weighted_sum / total_weight) - penalty).clamp(0.1, 1.0))
}

/// Tolerant freshness roll-up: `high_accuracy` only when every reported
/// value is user-provided or live; any historical value marks the whole
/// answer as estimated.
fn summarize_freshness(
    soil: Option<&SoilResult>,
    weather: Option<&WeatherResult>,
    crop_plan: Option<&CropPlan>,
) -> FreshnessSummary {
    let soil_freshness = soil.map(|result| result.data_freshness);
    let weather_freshness = weather.map(|result| result.data_freshness);
    // The plan is derived data, never direct observation.
    let crop_freshness = crop_plan.map(|_| DataFreshness::Estimated);

    let reported: Vec<DataFreshness> = [soil_freshness, weather_freshness, crop_freshness]
        .into_iter()
        .flatten()
        .collect();

    let overall = if !reported.is_empty()
        && reported
            .iter()
            .all(|freshness| freshness.is_high_accuracy())
    {
        OverallFreshness::HighAccuracy
    } else if reported
        .iter()
        .any(|freshness| *freshness == DataFreshness::Historical)
    {
        OverallFreshness::EstimatedFromHistorical
    } else {
        OverallFreshness::MixedSources
    };

    FreshnessSummary {
        soil: soil_freshness,
        weather: weather_freshness,
        crop_economics: crop_freshness,
        overall,
    }
}

/// Deduplicated union of agent data sources, first occurrence order.
fn collect_data_sources(
    soil: Option<&SoilResult>,
    weather: Option<&WeatherResult>,
    crop_plan: Option<&CropPlan>,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut sources = Vec::new();

    let all = soil
        .map(|result| result.data_sources.clone())
        .into_iter()
        .chain(weather.map(|result| result.data_sources.clone()))
        .chain(crop_plan.map(|plan| plan.data_sources.clone()))
        .flatten();

    for source in all {
        if seen.insert(source.clone()) {
            sources.push(source);
        }
    }

    sources
}

/// Surrogate soil result used when crop planning runs without a real soil
/// analysis.
pub fn default_soil_result() -> SoilResult {
    SoilResult {
        soil_type: SoilType::Loam,
        ph_level: 7.0,
        npk_levels: NpkLevels::ZERO,
        organic_matter_percent: 0.0,
        micronutrients: std::collections::BTreeMap::new(),
        soil_characteristics: soil_characteristics(SoilType::Loam),
        health_score: 5,
        health_confidence: 0.2,
        constraints: vec!["Using default values - soil analysis unavailable".to_string()],
        recommendations: vec!["Get soil tested for accurate recommendations".to_string()],
        data_sources: vec!["default_fallback".to_string()],
        data_freshness: DataFreshness::Default,
        location_context: LocationSnapshot::default(),
    }
}

/// Surrogate weather result used when crop planning runs without a real
/// weather analysis.
pub fn default_weather_result() -> WeatherResult {
    WeatherResult {
        season: Season::Kharif,
        season_dates: SeasonDates {
            start: "June 15",
            end: "October 15",
            sowing_window: "June-July",
        },
        temperature_range: TemperatureRange {
            min: 22.0,
            max: 35.0,
            optimal_range: "24-30°C".to_string(),
        },
        rainfall_mm: 800.0,
        rainfall_pattern: crate::models::RainfallPattern::Moderate,
        humidity_percent: 70.0,
        suitability_score: 5,
        suitability_confidence: 0.2,
        risk_assessment: RiskAssessment::default(),
        irrigation_needs: IrrigationNeeds {
            level: IrrigationLevel::Moderate,
            frequency: "weekly".to_string(),
            estimated_mm_per_week: 20,
            notes: "Using default values - weather analysis unavailable".to_string(),
        },
        optimal_crops: Vec::new(),
        data_sources: vec!["default_fallback".to_string()],
        data_freshness: DataFreshness::Default,
        location_context: LocationSnapshot::default(),
    }
}
