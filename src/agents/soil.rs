//! Soil analysis: extracts soil parameters from free text, merges them with
//! regional profiles, scores soil health, and learns new regional profiles
//! from well-attested user data.

use super::{mean, round2};
use crate::error::AgentError;
use crate::knowledge::{
    region_key, regional_soil_profile, soil_characteristics, DEFAULT_SOIL_PROFILE,
    SOIL_TYPE_SYNONYMS,
};
use crate::models::{
    AgentContext, DataFreshness, FallbackLevel, LocationSnapshot, MicronutrientReading, NpkLevels,
    SoilResult, SoilType,
};
use crate::retrieval::DocumentRetrieval;
use crate::store::{LearnedSoilProfile, LearningStore};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("static regex must parse")
}

static PH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        pattern(r"ph\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"ph\s*level\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"(\d+\.?\d*)\s*ph"),
        pattern(r"acidity\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
    ]
});

static NPK_RATIO_PATTERN: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?:npk|n-p-k)?\s*(\d+)\s*[-:]\s*(\d+)\s*[-:]\s*(\d+)"));

static NITROGEN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        pattern(r"nitrogen\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"n\s*(?:is|=|:)?\s*(\d+\.?\d*)\s*(?:kg|%)"),
        pattern(r"urea\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
    ]
});

static PHOSPHORUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        pattern(r"phosphorus\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"phosphate\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"p\s*(?:is|=|:)?\s*(\d+\.?\d*)\s*(?:kg|%)"),
    ]
});

static POTASSIUM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        pattern(r"potassium\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"potash\s*(?:is|=|:)?\s*(\d+\.?\d*)"),
        pattern(r"k\s*(?:is|=|:)?\s*(\d+\.?\d*)\s*(?:kg|%)"),
    ]
});

static ORGANIC_MATTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| pattern(r"organic\s*(?:matter|content)?\s*(?:is|=|:)?\s*(\d+\.?\d*)\s*%?"));

static MICRONUTRIENT_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        ("zinc", vec![pattern(r"zinc\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"zn\s*(?:is|=|:)?\s*(\d+\.?\d*)")]),
        ("iron", vec![pattern(r"iron\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"fe\s*(?:is|=|:)?\s*(\d+\.?\d*)")]),
        ("manganese", vec![pattern(r"manganese\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"mn\s*(?:is|=|:)?\s*(\d+\.?\d*)")]),
        ("copper", vec![pattern(r"copper\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"cu\s*(?:is|=|:)?\s*(\d+\.?\d*)")]),
        ("boron", vec![pattern(r"boron\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"b\s*(?:is|=|:)?\s*(\d+\.?\d*)\s*ppm")]),
        ("sulfur", vec![pattern(r"sulfur\s*(?:is|=|:)?\s*(\d+\.?\d*)"), pattern(r"sulphur\s*(?:is|=|:)?\s*(\d+\.?\d*)")]),
    ]
});

/// Regional baseline merged under user-provided values.
#[derive(Debug, Clone)]
struct SoilLocationContext {
    soil_type: SoilType,
    ph: f64,
    organic_matter: f64,
    fallback_level: FallbackLevel,
}

/// Extracted parameters plus their provenance.
#[derive(Debug, Clone)]
struct SoilParameters {
    soil_type: SoilType,
    ph: f64,
    npk: NpkLevels,
    organic_matter: f64,
    data_sources: Vec<String>,
    data_freshness: DataFreshness,
}

pub async fn analyze(
    query: &str,
    ctx: &AgentContext,
    store: &dyn LearningStore,
    retrieval: &dyn DocumentRetrieval,
) -> Result<SoilResult, AgentError> {
    info!(query = query, "Soil agent analyzing");

    // Retrieval is advisory; an empty result set changes nothing below.
    let documents = retrieval.retrieve(&format!("soil analysis {query}")).await;
    debug!(count = documents.len(), "Soil agent retrieved context documents");

    let query_lower = query.to_lowercase();
    let location = location_context(ctx, store).await;
    let parameters = extract_parameters(&query_lower, &location);
    let micronutrients = extract_micronutrients(&query_lower);

    let (health_score, health_confidence) = score_health(&parameters);
    let constraints = identify_constraints(&parameters);
    let recommendations = generate_recommendations(&parameters);

    learn_profile(ctx, store, &parameters, health_confidence).await;

    info!(
        health_score = health_score,
        confidence = health_confidence,
        soil_type = parameters.soil_type.as_str(),
        "Soil agent completed"
    );

    Ok(SoilResult {
        soil_type: parameters.soil_type,
        ph_level: parameters.ph,
        npk_levels: parameters.npk,
        organic_matter_percent: parameters.organic_matter,
        micronutrients,
        soil_characteristics: soil_characteristics(parameters.soil_type),
        health_score,
        health_confidence,
        constraints,
        recommendations,
        data_sources: parameters.data_sources,
        data_freshness: parameters.data_freshness,
        location_context: LocationSnapshot {
            pincode: ctx.pincode.clone(),
            district: ctx.district.clone(),
            state: ctx.state.clone(),
            fallback_level: Some(location.fallback_level),
        },
    })
}

/// Soil profile fallback: learned district → learned state → static state →
/// default.
async fn location_context(ctx: &AgentContext, store: &dyn LearningStore) -> SoilLocationContext {
    if let Some(district) = ctx.district.as_deref() {
        let key = region_key(district);
        if let Some(learned) = store.get_soil_profile(&key).await {
            info!(district = key.as_str(), "Using learned soil profile for district");
            return learned_context(&learned, FallbackLevel::LearnedDistrict);
        }
    }

    if let Some(state) = ctx.state.as_deref() {
        let key = region_key(state);
        if let Some(learned) = store.get_soil_profile(&key).await {
            info!(state = key.as_str(), "Using learned soil profile for state");
            return learned_context(&learned, FallbackLevel::LearnedState);
        }

        if let Some(profile) = regional_soil_profile(&key) {
            return SoilLocationContext {
                soil_type: profile.soil_type,
                ph: profile.ph,
                organic_matter: profile.organic_matter,
                fallback_level: FallbackLevel::StaticState,
            };
        }
    }

    SoilLocationContext {
        soil_type: DEFAULT_SOIL_PROFILE.soil_type,
        ph: DEFAULT_SOIL_PROFILE.ph,
        organic_matter: DEFAULT_SOIL_PROFILE.organic_matter,
        fallback_level: FallbackLevel::Default,
    }
}

fn learned_context(profile: &LearnedSoilProfile, level: FallbackLevel) -> SoilLocationContext {
    SoilLocationContext {
        soil_type: profile.soil_type,
        ph: profile.ph,
        organic_matter: profile.organic_matter.unwrap_or(0.5),
        fallback_level: level,
    }
}

fn extract_parameters(query_lower: &str, location: &SoilLocationContext) -> SoilParameters {
    let mut data_sources = Vec::new();

    let mut soil_type = location.soil_type;
    for (candidate, keywords) in SOIL_TYPE_SYNONYMS {
        if keywords.iter().any(|keyword| query_lower.contains(keyword)) {
            soil_type = *candidate;
            data_sources.push("user_query".to_string());
            break;
        }
    }
    if !data_sources.iter().any(|s| s == "user_query") && soil_type != SoilType::Unknown {
        data_sources.push("location_profile".to_string());
    }

    let mut ph = location.ph;
    for regex in PH_PATTERNS.iter() {
        if let Some(value) = first_capture(regex, query_lower) {
            if (0.0..=14.0).contains(&value) {
                ph = value;
                data_sources.push("user_query_ph".to_string());
                break;
            }
        }
    }

    let npk = extract_npk(query_lower);
    if npk.any_present() {
        data_sources.push("user_query_npk".to_string());
    }

    let mut organic_matter = location.organic_matter;
    if let Some(mut value) = first_capture(&ORGANIC_MATTER_PATTERN, query_lower) {
        // Values above 10 are percentages, not fractions.
        if value > 10.0 {
            value /= 100.0;
        }
        organic_matter = value;
        data_sources.push("user_query_om".to_string());
    }
    if query_lower.contains("rich organic") || query_lower.contains("high organic") {
        organic_matter = organic_matter.max(0.8);
    } else if query_lower.contains("low organic") || query_lower.contains("poor organic") {
        organic_matter = organic_matter.min(0.3);
    }

    let data_freshness = if data_sources
        .iter()
        .any(|s| s == "user_query_ph" || s == "user_query_npk")
    {
        DataFreshness::UserProvided
    } else {
        DataFreshness::Estimated
    };

    if data_sources.is_empty() {
        data_sources.push("location_profile".to_string());
    }

    SoilParameters {
        soil_type,
        ph,
        npk,
        organic_matter,
        data_sources,
        data_freshness,
    }
}

fn extract_npk(query_lower: &str) -> NpkLevels {
    // Composite "10-20-10" / "npk 10:20:10" form wins outright.
    if let Some(captures) = NPK_RATIO_PATTERN.captures(query_lower) {
        let parse = |index: usize| {
            captures
                .get(index)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        return NpkLevels {
            nitrogen: parse(1),
            phosphorus: parse(2),
            potassium: parse(3),
        };
    }

    let mut npk = NpkLevels::ZERO;
    npk.nitrogen = first_match(&NITROGEN_PATTERNS, query_lower).unwrap_or(0.0);
    npk.phosphorus = first_match(&PHOSPHORUS_PATTERNS, query_lower).unwrap_or(0.0);
    npk.potassium = first_match(&POTASSIUM_PATTERNS, query_lower).unwrap_or(0.0);

    // Qualitative phrases set floors when no number was given.
    if query_lower.contains("nitrogen deficient") || query_lower.contains("low nitrogen") {
        npk.nitrogen = npk.nitrogen.max(10.0);
    } else if query_lower.contains("high nitrogen") || query_lower.contains("rich nitrogen") {
        npk.nitrogen = npk.nitrogen.max(50.0);
    }

    npk
}

fn extract_micronutrients(query_lower: &str) -> BTreeMap<String, MicronutrientReading> {
    let mut readings = BTreeMap::new();

    for (nutrient, patterns) in MICRONUTRIENT_PATTERNS.iter() {
        if let Some(value) = first_match(patterns, query_lower) {
            readings.insert(
                (*nutrient).to_string(),
                MicronutrientReading::Measured {
                    value,
                    unit: "ppm".to_string(),
                    source: "user_query".to_string(),
                },
            );
            continue;
        }

        let deficiency = format!("{nutrient} deficien");
        let low = format!("low {nutrient}");
        if query_lower.contains(&deficiency) || query_lower.contains(&low) {
            readings.insert(
                (*nutrient).to_string(),
                MicronutrientReading::Status {
                    status: "deficient".to_string(),
                    source: "user_indication".to_string(),
                },
            );
        }
    }

    readings
}

fn first_capture(regex: &Regex, haystack: &str) -> Option<f64> {
    regex
        .captures(haystack)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn first_match(patterns: &[Regex], haystack: &str) -> Option<f64> {
    patterns
        .iter()
        .find_map(|regex| first_capture(regex, haystack))
}

/// Health score 1-10 plus a confidence that averages per-factor certainty.
fn score_health(parameters: &SoilParameters) -> (u8, f64) {
    let mut score: i32 = 5;
    let mut confidence_factors = Vec::new();

    let type_adjustment = match parameters.soil_type {
        SoilType::Loam | SoilType::Alluvial => 3,
        SoilType::BlackCotton | SoilType::Silt => 2,
        SoilType::Clay | SoilType::Red | SoilType::Peat => 1,
        SoilType::Chalk => -1,
        SoilType::Sandy | SoilType::Laterite | SoilType::Unknown => 0,
    };
    score += type_adjustment;
    confidence_factors.push(if parameters.soil_type == SoilType::Unknown {
        0.4
    } else {
        0.8
    });

    let ph = parameters.ph;
    if (6.0..=7.5).contains(&ph) {
        score += 2;
        confidence_factors.push(0.9);
    } else if (5.5..=8.0).contains(&ph) {
        score += 1;
        confidence_factors.push(0.75);
    } else if ph < 5.0 || ph > 8.5 {
        score -= 2;
        confidence_factors.push(0.8);
    } else {
        confidence_factors.push(0.6);
    }

    if parameters.organic_matter >= 0.6 {
        score += 1;
        confidence_factors.push(0.7);
    } else if parameters.organic_matter < 0.3 {
        score -= 1;
        confidence_factors.push(0.6);
    }

    let npk = &parameters.npk;
    if npk.nitrogen > 30.0 && npk.phosphorus > 20.0 && npk.potassium > 20.0 {
        score += 1;
        confidence_factors.push(0.85);
    } else if npk.any_present() {
        confidence_factors.push(0.7);
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let clamped = score.clamp(1, 10) as u8;
    let confidence = mean(&confidence_factors).unwrap_or(0.5);

    (clamped, round2(confidence))
}

fn identify_constraints(parameters: &SoilParameters) -> Vec<String> {
    let mut constraints: Vec<String> = Vec::new();

    let type_constraints: &[&str] = match parameters.soil_type {
        SoilType::Clay => &[
            "Poor drainage - risk of waterlogging",
            "Difficult to work when wet",
        ],
        SoilType::Sandy => &[
            "Low nutrient retention",
            "Requires frequent irrigation",
            "Low water holding capacity",
        ],
        SoilType::Laterite => &[
            "Low nutrient retention",
            "May be acidic",
            "Low organic matter",
        ],
        SoilType::Chalk => &[
            "Alkaline pH limits nutrient availability",
            "May cause iron chlorosis",
        ],
        SoilType::Peat => &["Poor drainage", "May be acidic", "Slow to warm in spring"],
        _ => &[],
    };
    constraints.extend(type_constraints.iter().map(ToString::to_string));

    let ph = parameters.ph;
    if ph < 5.5 {
        constraints.push(format!("Acidic soil (pH {ph}) - may require liming"));
    } else if ph > 8.0 {
        constraints.push(format!(
            "Alkaline soil (pH {ph}) - may cause micronutrient deficiency"
        ));
    }

    if parameters.organic_matter < 0.3 {
        constraints.push("Low organic matter - add compost or green manure".to_string());
    }

    if parameters.npk.nitrogen < 20.0 {
        constraints.push("Low nitrogen - consider nitrogen fertilization".to_string());
    }
    if parameters.npk.phosphorus < 15.0 {
        constraints.push("Low phosphorus - consider phosphorus supplementation".to_string());
    }
    if parameters.npk.potassium < 15.0 {
        constraints.push("Low potassium - consider potash application".to_string());
    }

    if constraints.is_empty() {
        constraints.push("No major constraints identified".to_string());
    }

    constraints
}

fn generate_recommendations(parameters: &SoilParameters) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    let type_recommendations: &[&str] = match parameters.soil_type {
        SoilType::Clay => &[
            "Add organic matter to improve drainage",
            "Use raised beds for better root development",
            "Avoid working soil when wet",
        ],
        SoilType::Sandy => &[
            "Add organic matter to improve water retention",
            "Use mulching to reduce water loss",
            "Apply fertilizers in split doses",
        ],
        SoilType::Loam => &[
            "Maintain organic matter levels with regular composting",
            "Practice crop rotation for soil health",
        ],
        SoilType::Laterite => &[
            "Add lime to correct acidity",
            "Regular organic matter application",
            "Micronutrient supplementation recommended",
        ],
        SoilType::BlackCotton => &[
            "Ensure proper drainage",
            "Add gypsum to improve soil structure",
            "Avoid waterlogging during monsoon",
        ],
        _ => &["Regular soil testing recommended"],
    };
    recommendations.extend(type_recommendations.iter().map(ToString::to_string));

    let ph = parameters.ph;
    if ph < 5.5 {
        recommendations.push("Apply agricultural lime to raise pH".to_string());
    } else if ph > 8.0 {
        recommendations.push("Apply elemental sulfur or organic acids to lower pH".to_string());
    }

    if parameters.organic_matter < 0.4 {
        recommendations.push("Add farmyard manure or compost (10-15 tons/ha)".to_string());
        recommendations.push("Consider green manuring with dhaincha or sunhemp".to_string());
    }

    if parameters.npk.nitrogen < 20.0 {
        recommendations.push("Apply urea or ammonium sulfate for nitrogen".to_string());
    }
    if parameters.npk.phosphorus < 15.0 {
        recommendations.push("Apply DAP or single super phosphate".to_string());
    }
    if parameters.npk.potassium < 15.0 {
        recommendations.push("Apply muriate of potash (MOP)".to_string());
    }

    recommendations
}

/// Persist a learned regional profile when the query carried credible soil
/// data. Failures are swallowed; learning never affects the response.
async fn learn_profile(
    ctx: &AgentContext,
    store: &dyn LearningStore,
    parameters: &SoilParameters,
    health_confidence: f64,
) {
    let user_provided = parameters.data_sources.iter().any(|s| s == "user_query");
    if !user_provided || health_confidence < 0.5 || parameters.soil_type == SoilType::Unknown {
        return;
    }

    let Some(region) = ctx.district.as_deref().or(ctx.state.as_deref()) else {
        return;
    };
    let key = region_key(region);

    let profile = LearnedSoilProfile {
        soil_type: parameters.soil_type,
        ph: parameters.ph,
        organic_matter: Some(parameters.organic_matter),
        nitrogen: Some(parameters.npk.nitrogen),
        phosphorus: Some(parameters.npk.phosphorus),
        potassium: Some(parameters.npk.potassium),
        confidence: Some(health_confidence),
    };

    if store
        .save_soil_profile(&key, &profile, "user_query_extracted")
        .await
    {
        info!(region = key.as_str(), "Learned soil profile from query");
    } else {
        debug!(region = key.as_str(), "Could not save learned soil profile");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::QueryRequest;
    use crate::retrieval::NoopRetrieval;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn context(district: Option<&str>, state: Option<&str>) -> AgentContext {
        let request = QueryRequest {
            query: String::new(),
            district: district.map(ToString::to_string),
            state: state.map(ToString::to_string),
            ..QueryRequest::default()
        };
        AgentContext::from_request(&request, Utc::now())
    }

    async fn analyze_query(query: &str, ctx: &AgentContext) -> SoilResult {
        let store = MemoryStore::new();
        analyze(query, ctx, &store, &NoopRetrieval).await.unwrap()
    }

    #[tokio::test]
    async fn extracts_clay_and_ph_from_query() {
        let ctx = context(None, None);
        let result = analyze_query("my soil is clay with pH 6.5", &ctx).await;

        assert_eq!(result.soil_type, SoilType::Clay);
        assert!((result.ph_level - 6.5).abs() < f64::EPSILON);
        assert_eq!(result.data_freshness, DataFreshness::UserProvided);
        assert!(result.data_sources.iter().any(|s| s == "user_query"));
    }

    #[tokio::test]
    async fn composite_npk_pattern_wins() {
        let ctx = context(None, None);
        let result = analyze_query("applied npk 10:20:10 last season", &ctx).await;

        assert!((result.npk_levels.nitrogen - 10.0).abs() < f64::EPSILON);
        assert!((result.npk_levels.phosphorus - 20.0).abs() < f64::EPSILON);
        assert!((result.npk_levels.potassium - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn qualitative_nitrogen_sets_floor() {
        let ctx = context(None, None);
        let result = analyze_query("my field is nitrogen deficient", &ctx).await;
        assert!((result.npk_levels.nitrogen - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn organic_matter_percent_is_normalized() {
        let ctx = context(None, None);
        let result = analyze_query("organic matter is 40%", &ctx).await;
        assert!((result.organic_matter_percent - 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn acidic_soil_yields_liming_guidance() {
        let ctx = context(None, None);
        let result = analyze_query("soil pH 5.2", &ctx).await;

        assert!(result.constraints.iter().any(|c| c.contains("Acidic")));
        assert!(result.recommendations.iter().any(|r| r.contains("lime")));
    }

    #[tokio::test]
    async fn out_of_range_ph_is_ignored() {
        let ctx = context(None, None);
        let result = analyze_query("soil ph 22", &ctx).await;
        // Falls back to the default profile value.
        assert!((result.ph_level - 7.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn state_profile_fills_missing_type() {
        let ctx = context(None, Some("Rajasthan"));
        let result = analyze_query("what should I plant", &ctx).await;

        assert_eq!(result.soil_type, SoilType::Sandy);
        assert_eq!(
            result.location_context.fallback_level,
            Some(FallbackLevel::StaticState)
        );
    }

    #[tokio::test]
    async fn learned_district_profile_outranks_static_state() {
        let store = MemoryStore::new();
        store
            .save_soil_profile(
                "pune",
                &LearnedSoilProfile {
                    soil_type: SoilType::Red,
                    ph: 6.2,
                    organic_matter: Some(0.6),
                    nitrogen: None,
                    phosphorus: None,
                    potassium: None,
                    confidence: Some(0.75),
                },
                "user_query_extracted",
            )
            .await;

        let ctx = context(Some("Pune"), Some("Maharashtra"));
        let result = analyze("crop advice", &ctx, &store, &NoopRetrieval)
            .await
            .unwrap();

        assert_eq!(result.soil_type, SoilType::Red);
        assert_eq!(
            result.location_context.fallback_level,
            Some(FallbackLevel::LearnedDistrict)
        );
    }

    #[tokio::test]
    async fn credible_user_data_learns_a_profile() {
        let store = MemoryStore::new();
        let ctx = context(Some("Nagpur"), Some("Maharashtra"));

        let result = analyze(
            "black cotton soil with pH 7.4",
            &ctx,
            &store,
            &NoopRetrieval,
        )
        .await
        .unwrap();

        assert!(result.health_confidence >= 0.5);
        let learned = store.get_soil_profile("nagpur").await;
        assert_eq!(learned.map(|p| p.soil_type), Some(SoilType::BlackCotton));
    }

    #[tokio::test]
    async fn no_region_means_no_learning() {
        let store = MemoryStore::new();
        let ctx = context(None, None);

        analyze("loam soil pH 6.8", &ctx, &store, &NoopRetrieval)
            .await
            .unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn micronutrient_deficiency_is_detected() {
        let ctx = context(None, None);
        let result = analyze_query("my crop shows zinc deficiency", &ctx).await;

        assert!(matches!(
            result.micronutrients.get("zinc"),
            Some(MicronutrientReading::Status { status, .. }) if status == "deficient"
        ));
    }

    #[tokio::test]
    async fn health_score_stays_in_range() {
        let ctx = context(None, None);
        for query in [
            "chalk soil ph 9.5 low organic",
            "loam soil ph 7.0 rich organic npk 40-30-30",
            "",
        ] {
            let result = analyze_query(query, &ctx).await;
            assert!((1..=10).contains(&result.health_score));
            assert!((0.0..=1.0).contains(&result.health_confidence));
        }
    }
}
