//! End-to-end pipeline tests over the orchestrator with an in-memory
//! learning store and every external endpoint pointed at an unroutable
//! port, so behavior is deterministic and offline.

use farmer_advisory::agents::Orchestrator;
use farmer_advisory::models::{
    AgentKind, DataFreshness, OverallFreshness, QueryRequest, Season, SoilType, UserProfile,
};
use farmer_advisory::retrieval::NoopRetrieval;
use farmer_advisory::store::MemoryStore;
use farmer_advisory::Config;
use std::sync::Arc;

fn offline_config() -> Config {
    Config {
        india_post_base_url: "http://127.0.0.1:9".to_string(),
        geocoder_base_url: "http://127.0.0.1:9".to_string(),
        open_meteo_base_url: "http://127.0.0.1:9".to_string(),
        ..Config::default()
    }
}

fn orchestrator() -> Orchestrator {
    Orchestrator::new(
        offline_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(NoopRetrieval),
    )
}

fn request(query: &str) -> QueryRequest {
    QueryRequest {
        query: query.to_string(),
        ..QueryRequest::default()
    }
}

#[tokio::test]
async fn clay_kharif_query_recommends_rice() {
    let result = orchestrator()
        .handle(&request(
            "my soil is clay with pH 6.5, what crops for kharif season",
        ))
        .await;

    let soil = result.soil_result.as_ref().expect("soil result");
    assert_eq!(soil.soil_type, SoilType::Clay);
    assert!((soil.ph_level - 6.5).abs() < f64::EPSILON);

    let weather = result.weather_result.as_ref().expect("weather result");
    assert_eq!(weather.season, Season::Kharif);

    let plan = result.crop_plan.as_ref().expect("crop plan");
    assert_eq!(plan.recommended_crops[0].name, "rice");

    for agent in [AgentKind::Soil, AgentKind::Weather, AgentKind::CropPlanning] {
        assert!(result.agents_invoked.contains(&agent));
    }
    assert!(result.agent_errors.is_empty());
}

#[tokio::test]
async fn sandy_soil_without_irrigation_avoids_thirsty_crops() {
    let query_request = QueryRequest {
        query: "sandy soil, no irrigation, suggest crops".to_string(),
        user_profile: Some(UserProfile {
            farm_size_ha: Some(2.0),
            irrigation_available: Some(false),
            previous_crop: None,
            budget: None,
        }),
        ..QueryRequest::default()
    };

    let result = orchestrator().handle(&query_request).await;
    let plan = result.crop_plan.as_ref().expect("crop plan");

    for crop in &plan.recommended_crops {
        assert_ne!(crop.name, "rice");
        assert_ne!(crop.name, "sugarcane");
        assert!(!crop.water_requirement.needs_irrigation());
    }
}

#[tokio::test]
async fn rabi_query_lands_on_winter_staples() {
    let result = orchestrator().handle(&request("rabi season crops")).await;

    let weather = result.weather_result.as_ref().expect("weather result");
    assert_eq!(weather.season, Season::Rabi);

    let plan = result.crop_plan.as_ref().expect("crop plan");
    let names: Vec<&str> = plan
        .recommended_crops
        .iter()
        .map(|crop| crop.name.as_str())
        .collect();
    assert!(
        names.contains(&"wheat") || names.contains(&"chickpea") || names.contains(&"mustard"),
        "expected a rabi staple in {names:?}"
    );
}

#[tokio::test]
async fn acidic_soil_gets_lime_guidance() {
    let result = orchestrator().handle(&request("soil pH 5.2")).await;

    let soil = result.soil_result.as_ref().expect("soil result");
    assert!(soil.constraints.iter().any(|c| c.contains("Acidic")));
    assert!(soil.recommendations.iter().any(|r| r.contains("lime")));
}

#[tokio::test]
async fn data_sources_are_deduplicated() {
    let result = orchestrator()
        .handle(&request("clay soil crops for kharif season"))
        .await;

    let mut sorted = result.data_sources.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), result.data_sources.len());
    assert!(!result.data_sources.is_empty());
}

#[tokio::test]
async fn overall_confidence_respects_bounds() {
    for query in [
        "crops",
        "hello",
        "soil weather crop price yield msp market",
        "my soil is clay with pH 6.5, what crops for kharif season",
    ] {
        let result = orchestrator().handle(&request(query)).await;
        assert!(
            (0.1..=1.0).contains(&result.overall_confidence),
            "confidence {} out of bounds for {query:?}",
            result.overall_confidence
        );
    }
}

#[tokio::test]
async fn prompt_has_a_section_for_every_result() {
    let result = orchestrator()
        .handle(&request("clay soil crops for kharif season"))
        .await;

    assert!(result.soil_result.is_some());
    assert!(result.weather_result.is_some());
    assert!(result.crop_plan.is_some());

    let prompt = &result.llm_prompt_input;
    assert!(prompt.contains("SOIL ANALYSIS"));
    assert!(prompt.contains("WEATHER ANALYSIS"));
    assert!(prompt.contains("CROP RECOMMENDATIONS"));
    assert!(prompt.contains("User Query:"));
    assert!(prompt.contains("Data Confidence:"));
}

#[tokio::test]
async fn offline_weather_reports_historical_freshness() {
    let result = orchestrator()
        .handle(&request("kharif season weather outlook"))
        .await;

    let weather = result.weather_result.as_ref().expect("weather result");
    assert_eq!(weather.data_freshness, DataFreshness::Historical);
    assert_eq!(
        result.data_freshness_summary.overall,
        OverallFreshness::EstimatedFromHistorical
    );
}

#[tokio::test]
async fn default_intent_selection_runs_all_agents() {
    let result = orchestrator().handle(&request("namaste")).await;

    assert!(result.intent_analysis.is_default_selection);
    assert_eq!(result.agents_invoked.len(), 3);
    assert!(result.soil_result.is_some());
    assert!(result.weather_result.is_some());
    assert!(result.crop_plan.is_some());
}

#[tokio::test]
async fn identical_requests_produce_identical_answers() {
    let orchestrator = orchestrator();
    let query_request = request("my soil is clay with pH 6.5, what crops for kharif season");

    let first = orchestrator.handle(&query_request).await;
    let second = orchestrator.handle(&query_request).await;

    assert_eq!(first.overall_confidence, second.overall_confidence);
    assert_eq!(first.llm_prompt_input, second.llm_prompt_input);

    let mut first_sources = first.data_sources.clone();
    let mut second_sources = second.data_sources.clone();
    first_sources.sort();
    second_sources.sort();
    assert_eq!(first_sources, second_sources);
}

#[tokio::test]
async fn result_limits_hold_for_well_formed_queries() {
    let result = orchestrator()
        .handle(&request("clay soil crops for kharif season"))
        .await;

    let plan = result.crop_plan.as_ref().expect("crop plan");
    assert!(plan.recommended_crops.len() <= 4);
    assert!(plan.alternatives.len() <= 5);
    assert!(plan.precautions.len() <= 10);

    let weather = result.weather_result.as_ref().expect("weather result");
    assert!(weather.optimal_crops.len() <= 8);

    for pair in plan.recommended_crops.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}
