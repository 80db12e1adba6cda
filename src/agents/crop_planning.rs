//! Crop planning: ranks crops against the soil and weather analyses,
//! prices them out, picks varieties, resolves government schemes, and
//! compiles risks and precautions.

use super::round2;
use crate::error::AgentError;
use crate::knowledge::{scheme_detail, CropInfo, CROP_DATABASE};
use crate::models::{
    AgentContext, AlternativeCrop, CropEconomics, CropPlan, CropRecommendation,
    InputCostBreakdown, PlanRisk, PlanRiskKind, PlanningFactors, Precaution, PrecautionPriority,
    ProfitEstimate, RevenueEstimate, RiskLevel, Season, SoilResult, SoilType, VarietyPick,
    WeatherResult, YieldEstimate,
};
use crate::retrieval::DocumentRetrieval;
use tracing::{debug, info};

const MAX_RECOMMENDATIONS: usize = 4;
const MAX_CANDIDATES: usize = 5;
const MAX_ALTERNATIVES: usize = 5;
const MAX_PRECAUTIONS: usize = 10;
const MAX_VARIETIES: usize = 4;

pub async fn plan(
    soil: &SoilResult,
    weather: &WeatherResult,
    query: &str,
    ctx: &AgentContext,
    retrieval: &dyn DocumentRetrieval,
) -> Result<CropPlan, AgentError> {
    info!(
        soil_health = soil.health_score,
        soil_confidence = soil.health_confidence,
        weather_suitability = weather.suitability_score,
        weather_confidence = weather.suitability_confidence,
        "Crop planning agent running"
    );

    // Advisory retrieval; documents add context but never gate the plan.
    let rag_query = format!(
        "crop recommendations for {} soil pH {} in {} season",
        soil.soil_type.as_str(),
        soil.ph_level,
        weather.season.as_str()
    );
    let documents = retrieval.retrieve(&rag_query).await;
    debug!(count = documents.len(), query = query, "Crop planner retrieved context documents");

    let candidates = select_candidates(soil, weather, ctx);
    let mut recommendations: Vec<CropRecommendation> = candidates
        .iter()
        .take(MAX_CANDIDATES)
        .map(|crop| build_recommendation(crop, soil, weather, ctx))
        .collect();

    // Stable sort: database order breaks confidence ties.
    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    recommendations.truncate(MAX_RECOMMENDATIONS);

    let alternatives = find_alternatives(&recommendations, soil, weather);
    let risks = assess_risks(soil, weather);
    let precautions = suggest_precautions(&risks, weather);
    let overall_confidence = aggregate_confidence(
        soil.health_confidence,
        weather.suitability_confidence,
        &recommendations,
    );

    info!(
        recommended = recommendations.len(),
        confidence = overall_confidence,
        "Crop planning agent completed"
    );

    Ok(CropPlan {
        recommended_crops: recommendations,
        alternatives,
        risks,
        precautions,
        overall_confidence,
        season: weather.season,
        planning_factors: PlanningFactors {
            soil_health: soil.health_score,
            soil_confidence: soil.health_confidence,
            weather_suitability: weather.suitability_score,
            weather_confidence: weather.suitability_confidence,
            irrigation_available: ctx.irrigation_available,
        },
        data_sources: vec![
            "rag_knowledge".to_string(),
            "crop_database".to_string(),
            "government_msp".to_string(),
        ],
    })
}

/// Soil filter, irrigation gate, then weather cross-reference: crops the
/// weather agent also likes come first, then up to three of the rest.
fn select_candidates(
    soil: &SoilResult,
    weather: &WeatherResult,
    ctx: &AgentContext,
) -> Vec<&'static CropInfo> {
    let suitable: Vec<&'static CropInfo> = CROP_DATABASE
        .iter()
        .filter(|crop| soil.soil_type == SoilType::Unknown || crop.suits_soil(soil.soil_type))
        .filter(|crop| ctx.irrigation_available || !crop.water_requirement.needs_irrigation())
        .collect();

    let weather_names: Vec<&str> = weather
        .optimal_crops
        .iter()
        .map(|entry| entry.crop.as_str())
        .collect();

    if weather_names.is_empty() {
        return suitable;
    }

    let (prioritized, remaining): (Vec<_>, Vec<_>) = suitable
        .into_iter()
        .partition(|crop| weather_names.contains(&crop.name));

    let mut candidates = prioritized;
    candidates.extend(remaining.into_iter().take(3));
    candidates
}

fn build_recommendation(
    crop: &'static CropInfo,
    soil: &SoilResult,
    weather: &WeatherResult,
    ctx: &AgentContext,
) -> CropRecommendation {
    CropRecommendation {
        name: crop.name.to_string(),
        confidence: crop_confidence(crop, soil, weather),
        reasoning: build_reasoning(crop, soil, weather),
        expected_yield: estimate_yield(crop, soil.health_score),
        duration_months: crop.duration_months,
        water_requirement: crop.water_requirement,
        msp_available: crop.msp_2024.is_some(),
        economics: crop_economics(crop, ctx.farm_size_ha),
        varieties: recommend_varieties(crop, soil, weather),
        government_schemes: crop
            .government_schemes
            .iter()
            .map(|scheme| scheme_detail(scheme, crop.msp_2024))
            .collect(),
    }
}

fn crop_confidence(crop: &CropInfo, soil: &SoilResult, weather: &WeatherResult) -> f64 {
    let mut confidence = 0.7;

    let soil_health = f64::from(soil.health_score) / 10.0;
    confidence *= (0.4 + 0.6 * soil_health) * (0.5 + 0.5 * soil.health_confidence);

    let weather_score = f64::from(weather.suitability_score) / 10.0;
    confidence *= (0.4 + 0.6 * weather_score) * (0.5 + 0.5 * weather.suitability_confidence);

    if crop.suits_soil(soil.soil_type) {
        confidence *= 1.15;
    } else {
        confidence *= 0.85;
    }

    if crop.msp_2024.is_some() {
        confidence *= 1.05;
    }

    round2(confidence.min(1.0))
}

fn build_reasoning(crop: &CropInfo, soil: &SoilResult, weather: &WeatherResult) -> String {
    let mut reasons = Vec::new();

    if crop.suits_soil(soil.soil_type) {
        reasons.push(format!("well-suited for {} soil", soil.soil_type.as_str()));
    }

    let rainfall = weather.rainfall_mm;
    match crop.water_requirement {
        crate::models::WaterRequirement::Low if rainfall < 400.0 => {
            reasons.push("low water requirement matches rainfall".to_string());
        }
        crate::models::WaterRequirement::High if rainfall > 800.0 => {
            reasons.push("adequate rainfall for high water needs".to_string());
        }
        _ => {}
    }

    if let Some(msp) = crop.msp_2024 {
        reasons.push(format!("MSP of ₹{msp}/quintal ensures price security"));
    }

    reasons.push(format!("suitable for {} season", weather.season.as_str()));

    let mut name = crop.name.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("{name} is recommended because it is {}", reasons.join(", "))
}

fn estimate_yield(crop: &CropInfo, soil_health: u8) -> YieldEstimate {
    let (multiplier, quality) = match soil_health {
        8..=10 => (1.15, "optimal"),
        6 | 7 => (1.0, "good"),
        4 | 5 => (0.85, "moderate"),
        _ => (0.7, "challenging"),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let adjusted = (f64::from(crop.expected_yield_kg_ha) * multiplier) as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let low = (f64::from(adjusted) * 0.85) as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let high = (f64::from(adjusted) * 1.1) as u32;
    #[allow(clippy::cast_possible_truncation)]
    let impact = ((multiplier - 1.0) * 100.0).round() as i32;

    YieldEstimate {
        kg_per_ha: adjusted,
        range: format!("{low}-{high} kg/ha"),
        quality_factor: quality,
        soil_health_impact: format!("{impact:+}% from soil conditions"),
    }
}

fn crop_economics(crop: &CropInfo, farm_size_ha: f64) -> CropEconomics {
    let costs = &crop.input_costs;
    let total_input_cost = f64::from(costs.total()) * farm_size_ha;

    let expected_yield_kg = f64::from(crop.expected_yield_kg_ha) * farm_size_ha;
    let yield_quintals = expected_yield_kg / 100.0;

    let min_revenue = yield_quintals * f64::from(crop.market_price_range.min);
    let max_revenue = yield_quintals * f64::from(crop.market_price_range.max);
    let msp_revenue = crop.msp_2024.map(|msp| yield_quintals * f64::from(msp));

    let min_profit = min_revenue - total_input_cost;
    let max_profit = max_revenue - total_input_cost;
    let msp_profit = msp_revenue.map(|revenue| revenue - total_input_cost);

    let roi_percent = if total_input_cost > 0.0 {
        ((max_profit / total_input_cost) * 1000.0).round() / 10.0
    } else {
        0.0
    };

    CropEconomics {
        input_costs: InputCostBreakdown {
            seeds: f64::from(costs.seeds) * farm_size_ha,
            fertilizers: f64::from(costs.fertilizers) * farm_size_ha,
            irrigation: f64::from(costs.irrigation) * farm_size_ha,
            pesticides: f64::from(costs.pesticides) * farm_size_ha,
            total: total_input_cost,
        },
        expected_yield_kg,
        revenue_estimate: RevenueEstimate {
            at_market_min: min_revenue,
            at_market_max: max_revenue,
            at_msp: msp_revenue,
        },
        profit_estimate: ProfitEstimate {
            at_market_min: min_profit,
            at_market_max: max_profit,
            at_msp: msp_profit,
        },
        roi_percent,
        msp_2024: crop.msp_2024,
        price_per_quintal: crop.market_price_range,
        farm_size_ha,
    }
}

/// Conditions drive variety choice: drought picks drought-resistant lines,
/// frost picks early harvests, good soil unlocks high-yield lines. At
/// least one high-yield option is always included when the crop has one.
fn recommend_varieties(
    crop: &CropInfo,
    soil: &SoilResult,
    weather: &WeatherResult,
) -> Vec<VarietyPick> {
    let mut picks: Vec<VarietyPick> = Vec::new();
    let drought = weather.risk_assessment.drought.level;
    let frost = weather.risk_assessment.frost.level;

    if drought.is_elevated() {
        for name in crop.varieties_of("drought_resistant").iter().take(2) {
            picks.push(VarietyPick {
                name: (*name).to_string(),
                kind: "drought_resistant",
                reason: "Recommended due to low rainfall risk",
            });
        }
    }

    if frost.is_elevated() {
        let early = {
            let short = crop.varieties_of("short_duration");
            if short.is_empty() {
                crop.varieties_of("early_maturing")
            } else {
                short
            }
        };
        for name in early.iter().take(2) {
            picks.push(VarietyPick {
                name: (*name).to_string(),
                kind: "short_duration",
                reason: "Early harvest before frost",
            });
        }
    }

    if soil.health_score >= 7 {
        for name in crop.varieties_of("high_yield").iter().take(2) {
            picks.push(VarietyPick {
                name: (*name).to_string(),
                kind: "high_yield",
                reason: "Good soil supports high-yield variety",
            });
        }
    } else {
        let resilient = {
            let disease = crop.varieties_of("disease_resistant");
            if disease.is_empty() {
                crop.varieties_of("drought_resistant")
            } else {
                disease
            }
        };
        for name in resilient.iter().take(2) {
            picks.push(VarietyPick {
                name: (*name).to_string(),
                kind: "resilient",
                reason: "Better suited for challenging conditions",
            });
        }
    }

    if !picks.iter().any(|pick| pick.kind == "high_yield") {
        if let Some(name) = crop.varieties_of("high_yield").first() {
            picks.push(VarietyPick {
                name: (*name).to_string(),
                kind: "high_yield",
                reason: "High yield potential",
            });
        }
    }

    picks.truncate(MAX_VARIETIES);
    picks
}

fn find_alternatives(
    recommendations: &[CropRecommendation],
    soil: &SoilResult,
    weather: &WeatherResult,
) -> Vec<AlternativeCrop> {
    let recommended: Vec<&str> = recommendations.iter().map(|r| r.name.as_str()).collect();
    let mut alternatives = Vec::new();

    let season_options: &[(&str, &str)] = match weather.season {
        Season::Rabi => &[
            ("lentil", "Short duration, nitrogen fixing"),
            ("pea", "Low water requirement, good market"),
            ("linseed", "Drought tolerant, dual purpose (seed + oil)"),
        ],
        Season::Zaid => &[
            ("cucumber", "Short duration, good market price"),
            ("watermelon", "Heat tolerant, high value"),
            ("moong", "Short duration, nitrogen fixing"),
        ],
        Season::Kharif | Season::Unknown => &[
            ("millet", "Low water requirement, drought resistant"),
            ("sorghum", "Hardy crop, good fodder value"),
            ("pigeonpea", "Nitrogen fixing, low input needs"),
        ],
    };

    for (crop, reason) in season_options {
        if !recommended.contains(crop) {
            alternatives.push(AlternativeCrop {
                crop: (*crop).to_string(),
                reason: (*reason).to_string(),
                kind: "low_input_alternative",
            });
        }
    }

    match soil.soil_type {
        SoilType::Sandy if !recommended.contains(&"groundnut") => {
            alternatives.push(AlternativeCrop {
                crop: "groundnut".to_string(),
                reason: "Ideal for sandy soil drainage".to_string(),
                kind: "soil_specific",
            });
        }
        SoilType::Clay if !recommended.contains(&"rice") => {
            alternatives.push(AlternativeCrop {
                crop: "rice".to_string(),
                reason: "Clay soil water retention suits rice".to_string(),
                kind: "soil_specific",
            });
        }
        _ => {}
    }

    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}

fn assess_risks(soil: &SoilResult, weather: &WeatherResult) -> Vec<PlanRisk> {
    let mut risks = Vec::new();

    for constraint in &soil.constraints {
        let lowered = constraint.to_lowercase();
        if lowered.contains("waterlogging") {
            risks.push(PlanRisk {
                kind: PlanRiskKind::Soil,
                severity: RiskLevel::Moderate,
                description: "Waterlogging risk in monsoon - avoid flood-sensitive crops"
                    .to_string(),
                affected_crops: to_strings(&["groundnut", "chickpea", "mustard"]),
                mitigation: None,
            });
        } else if lowered.contains("low water retention") {
            risks.push(PlanRisk {
                kind: PlanRiskKind::Soil,
                severity: RiskLevel::Moderate,
                description: "Sandy soil needs frequent irrigation".to_string(),
                affected_crops: to_strings(&["rice", "sugarcane"]),
                mitigation: None,
            });
        }
    }

    let assessment = &weather.risk_assessment;
    if assessment.drought.level.is_elevated() {
        risks.push(PlanRisk {
            kind: PlanRiskKind::Weather,
            severity: assessment.drought.level,
            description: "Drought risk - plan irrigation or choose drought-tolerant varieties"
                .to_string(),
            affected_crops: to_strings(&["rice", "sugarcane", "maize"]),
            mitigation: None,
        });
    }
    if assessment.flood.level.is_elevated() {
        risks.push(PlanRisk {
            kind: PlanRiskKind::Weather,
            severity: assessment.flood.level,
            description: "Heavy rainfall may cause flooding - ensure drainage".to_string(),
            affected_crops: to_strings(&["groundnut", "potato", "onion"]),
            mitigation: None,
        });
    }
    if assessment.disease_pressure.level.is_elevated() {
        risks.push(PlanRisk {
            kind: PlanRiskKind::Disease,
            severity: assessment.disease_pressure.level,
            description: "High humidity increases fungal disease risk".to_string(),
            affected_crops: to_strings(&["rice", "potato", "tomato"]),
            mitigation: None,
        });
    }

    risks.push(PlanRisk {
        kind: PlanRiskKind::Market,
        severity: RiskLevel::Low,
        description: "Price volatility possible - consider MSP-covered crops".to_string(),
        affected_crops: Vec::new(),
        mitigation: Some("Register with local procurement agency".to_string()),
    });

    risks
}

fn suggest_precautions(risks: &[PlanRisk], weather: &WeatherResult) -> Vec<Precaution> {
    let mut precautions = Vec::new();
    let has = |kind: PlanRiskKind| risks.iter().any(|risk| risk.kind == kind);

    if has(PlanRiskKind::Weather) {
        if weather.risk_assessment.drought.level.is_elevated() {
            precautions.extend([
                precaution("Install drip/sprinkler irrigation", PrecautionPriority::High, "before_sowing"),
                precaution("Use drought-resistant varieties", PrecautionPriority::High, "seed_selection"),
                precaution("Apply mulch to conserve moisture", PrecautionPriority::Medium, "after_germination"),
            ]);
        }
        if weather.risk_assessment.flood.level.is_elevated() {
            precautions.extend([
                precaution("Create drainage channels", PrecautionPriority::High, "before_sowing"),
                precaution("Use raised bed cultivation", PrecautionPriority::Medium, "land_preparation"),
                precaution("Keep flood-tolerant varieties ready", PrecautionPriority::Medium, "seed_selection"),
            ]);
        }
    }

    if has(PlanRiskKind::Disease) {
        precautions.extend([
            precaution("Apply preventive fungicide spray", PrecautionPriority::Medium, "regular_intervals"),
            precaution("Maintain proper plant spacing", PrecautionPriority::Medium, "sowing"),
            precaution("Remove infected plants immediately", PrecautionPriority::High, "monitoring"),
        ]);
    }

    if has(PlanRiskKind::Soil) {
        precautions.extend([
            precaution("Apply soil amendments as recommended", PrecautionPriority::High, "before_sowing"),
            precaution("Practice crop rotation", PrecautionPriority::Medium, "planning"),
            precaution("Add organic matter to improve soil structure", PrecautionPriority::Medium, "land_preparation"),
        ]);
    }

    // Baseline precautions regardless of risk profile.
    precautions.extend([
        precaution("Get crop insurance under PMFBY", PrecautionPriority::High, "before_sowing"),
        precaution("Register for MSP procurement if applicable", PrecautionPriority::Medium, "pre_harvest"),
        precaution("Maintain records for scheme benefits", PrecautionPriority::Low, "ongoing"),
    ]);

    precautions.truncate(MAX_PRECAUTIONS);
    precautions
}

fn precaution(action: &str, priority: PrecautionPriority, timing: &'static str) -> Precaution {
    Precaution {
        action: action.to_string(),
        priority,
        timing,
    }
}

/// Weighted blend: soil 30%, weather 30%, crop matching 40%.
fn aggregate_confidence(
    soil_confidence: f64,
    weather_confidence: f64,
    recommendations: &[CropRecommendation],
) -> f64 {
    let crop_confidence = super::mean(
        &recommendations
            .iter()
            .map(|r| r.confidence)
            .collect::<Vec<_>>(),
    )
    .unwrap_or(0.5);

    round2(0.3 * soil_confidence + 0.3 * weather_confidence + 0.4 * crop_confidence)
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}
