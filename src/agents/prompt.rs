//! Deterministic, bounded prompt assembly for the external LLM renderer.
//! Every non-empty agent result gets its own section; list sections are
//! capped so the prompt stays bounded regardless of agent output size.

use crate::models::{
    AgentContext, AgentErrorEntry, CropPlan, SoilResult, WeatherResult,
};

const SECTION_RULE: &str = "========================================";

/// Minimal prompt used when orchestration itself fails.
pub fn fallback_prompt(query: &str) -> String {
    format!(
        "Error processing query: {query}. Please provide general farming advice for the user's question."
    )
}

#[allow(clippy::too_many_lines)]
pub fn build_llm_prompt(
    query: &str,
    ctx: &AgentContext,
    soil: Option<&SoilResult>,
    weather: Option<&WeatherResult>,
    crop_plan: Option<&CropPlan>,
    overall_confidence: f64,
    data_sources: &[String],
    agent_errors: &[AgentErrorEntry],
) -> String {
    let mut lines: Vec<String> = vec![
        format!("User Query: {query}"),
        format!("Response Confidence: {:.0}%", overall_confidence * 100.0),
        String::new(),
    ];

    let mut location_parts = Vec::new();
    if let Some(state) = ctx.state.as_deref() {
        location_parts.push(format!("State: {state}"));
    }
    if let Some(district) = ctx.district.as_deref() {
        location_parts.push(format!("District: {district}"));
    }
    if !location_parts.is_empty() {
        lines.push(format!("Location: {}", location_parts.join(", ")));
        lines.push(String::new());
    }

    lines.push("Analysis Results:".to_string());
    lines.push(SECTION_RULE.to_string());

    if let Some(soil) = soil {
        lines.push(String::new());
        lines.push("SOIL ANALYSIS:".to_string());
        lines.push(format!("- Soil Type: {}", soil.soil_type.as_str()));
        lines.push(format!("- pH Level: {}", soil.ph_level));
        lines.push(format!(
            "- Health Score: {}/10 (Confidence: {:.0}%)",
            soil.health_score,
            soil.health_confidence * 100.0
        ));

        if soil.npk_levels.any_present() {
            lines.push(format!(
                "- NPK Levels: N={}, P={}, K={}",
                soil.npk_levels.nitrogen, soil.npk_levels.phosphorus, soil.npk_levels.potassium
            ));
        }
        if soil.organic_matter_percent > 0.0 {
            lines.push(format!(
                "- Organic Matter: {}%",
                soil.organic_matter_percent
            ));
        }
        if !soil.constraints.is_empty() {
            lines.push(format!(
                "- Constraints: {}",
                join_capped(&soil.constraints, 3)
            ));
        }
        if !soil.recommendations.is_empty() {
            lines.push(format!(
                "- Soil Recommendations: {}",
                join_capped(&soil.recommendations, 3)
            ));
        }
        lines.push(String::new());
    }

    if let Some(weather) = weather {
        lines.push("WEATHER ANALYSIS:".to_string());
        lines.push(format!("- Season: {}", weather.season.as_str()));
        lines.push(format!(
            "- Temperature: {}°C - {}°C",
            weather.temperature_range.min, weather.temperature_range.max
        ));
        lines.push(format!("- Expected Rainfall: {}mm", weather.rainfall_mm));
        lines.push(format!("- Humidity: {}%", weather.humidity_percent));
        lines.push(format!(
            "- Suitability Score: {}/10",
            weather.suitability_score
        ));
        lines.push(format!(
            "- Irrigation Needs: {} ({})",
            weather.irrigation_needs.level.as_str(),
            weather.irrigation_needs.notes
        ));
        if !weather.risk_assessment.summary.is_empty() {
            lines.push(format!(
                "- Weather Risks: {}",
                join_capped(&weather.risk_assessment.summary, 3)
            ));
        }
        lines.push(String::new());
    }

    if let Some(plan) = crop_plan {
        lines.push("CROP RECOMMENDATIONS:".to_string());
        for (index, crop) in plan.recommended_crops.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}:", index + 1, crop.name.to_uppercase()));
            lines.push(format!(
                "   - Confidence: {:.0}%",
                crop.confidence * 100.0
            ));
            lines.push(format!("   - Reasoning: {}", crop.reasoning));
            lines.push(format!(
                "   - Expected Yield: {}",
                crop.expected_yield.range
            ));
            lines.push(format!("   - Duration: {} months", crop.duration_months));

            let total_cost = crop.economics.input_costs.total;
            if total_cost > 0.0 {
                lines.push(format!(
                    "   - Estimated Input Cost: ₹{}/ha",
                    group_thousands(total_cost)
                ));
            }
            if let Some(msp) = crop.economics.msp_2024 {
                lines.push(format!("   - MSP 2024: ₹{msp}/quintal"));
            }

            if !crop.varieties.is_empty() {
                let names: Vec<&str> = crop
                    .varieties
                    .iter()
                    .take(2)
                    .map(|variety| variety.name.as_str())
                    .collect();
                lines.push(format!("   - Recommended Varieties: {}", names.join(", ")));
            }
            if !crop.government_schemes.is_empty() {
                let names: Vec<&str> = crop
                    .government_schemes
                    .iter()
                    .take(2)
                    .map(|scheme| scheme.name.as_str())
                    .collect();
                lines.push(format!("   - Applicable Schemes: {}", names.join(", ")));
            }
        }

        if !plan.alternatives.is_empty() {
            let entries: Vec<String> = plan
                .alternatives
                .iter()
                .take(3)
                .map(|alt| format!("{} ({})", alt.crop, alt.reason))
                .collect();
            lines.push(format!("\nAlternative Crops: {}", entries.join("; ")));
        }

        if !plan.risks.is_empty() {
            let entries: Vec<String> = plan
                .risks
                .iter()
                .take(3)
                .map(|risk| {
                    format!(
                        "{}: {}",
                        risk_kind_label(risk.kind),
                        risk.description
                    )
                })
                .collect();
            lines.push(format!("\nKey Risks: {}", entries.join("; ")));
        }

        if !plan.precautions.is_empty() {
            let entries: Vec<String> = plan
                .precautions
                .iter()
                .take(4)
                .map(|p| format!("{} [{}]", p.action, p.priority.as_str()))
                .collect();
            lines.push(format!("\nPrecautions: {}", entries.join("; ")));
        }
    }

    lines.push(String::new());
    lines.push(SECTION_RULE.to_string());
    lines.push(format!(
        "Data Confidence: {:.0}%",
        overall_confidence * 100.0
    ));
    let sources: Vec<&str> = data_sources.iter().take(5).map(String::as_str).collect();
    lines.push(format!(
        "Data Sources: {}",
        if sources.is_empty() {
            "unknown".to_string()
        } else {
            sources.join(", ")
        }
    ));

    if !agent_errors.is_empty() {
        let failed: Vec<&str> = agent_errors
            .iter()
            .map(|entry| entry.agent.as_str())
            .collect();
        lines.push(format!(
            "\nNote: Some analyses incomplete due to: {}",
            failed.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push(SECTION_RULE.to_string());
    lines.push("Instructions for Response:".to_string());
    lines.push("- Provide a helpful, natural response to the farmer".to_string());
    lines.push("- Focus on practical, actionable farming advice".to_string());
    lines.push("- Explain technical terms in simple language".to_string());
    lines.push("- Include specific recommendations based on the analysis".to_string());
    lines.push("- Mention government schemes if applicable".to_string());
    lines.push("- Include any risks and how to mitigate them".to_string());
    if overall_confidence < 0.5 {
        lines.push("- Since confidence is low, mention that recommendations are estimates".to_string());
    }
    lines.push("- Keep response concise but comprehensive (2-3 paragraphs)".to_string());
    lines.push(String::new());
    lines.push("Response:".to_string());

    lines.join("\n")
}

fn join_capped(entries: &[String], cap: usize) -> String {
    entries
        .iter()
        .take(cap)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

fn risk_kind_label(kind: crate::models::PlanRiskKind) -> &'static str {
    match kind {
        crate::models::PlanRiskKind::Soil => "soil",
        crate::models::PlanRiskKind::Weather => "weather",
        crate::models::PlanRiskKind::Disease => "disease",
        crate::models::PlanRiskKind::Market => "market",
    }
}

/// Western three-digit grouping of a whole rupee amount.
fn group_thousands(amount: f64) -> String {
    let whole = format!("{:.0}", amount.abs());
    let mut grouped = String::new();
    for (index, digit) in whole.chars().enumerate() {
        let remaining = whole.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if amount < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryRequest;
    use chrono::Utc;

    #[test]
    fn thousands_grouping_matches_expected_format() {
        assert_eq!(group_thousands(27500.0), "27,500");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
        assert_eq!(group_thousands(950.0), "950");
        assert_eq!(group_thousands(-27500.0), "-27,500");
    }

    #[test]
    fn fallback_prompt_names_the_query() {
        let prompt = fallback_prompt("what to grow");
        assert!(prompt.contains("what to grow"));
    }

    #[test]
    fn low_confidence_adds_estimates_note() {
        let ctx = AgentContext::from_request(&QueryRequest::default(), Utc::now());

        let low = build_llm_prompt("q", &ctx, None, None, None, 0.3, &[], &[]);
        assert!(low.contains("mention that recommendations are estimates"));

        let high = build_llm_prompt("q", &ctx, None, None, None, 0.8, &[], &[]);
        assert!(!high.contains("mention that recommendations are estimates"));
    }

    #[test]
    fn location_line_appears_when_state_is_known() {
        let request = QueryRequest {
            state: Some("Punjab".to_string()),
            district: Some("Ludhiana".to_string()),
            ..QueryRequest::default()
        };
        let ctx = AgentContext::from_request(&request, Utc::now());

        let prompt = build_llm_prompt("q", &ctx, None, None, None, 0.7, &[], &[]);
        assert!(prompt.contains("Location: State: Punjab, District: Ludhiana"));
    }

    #[test]
    fn errors_are_reported_in_a_note() {
        let ctx = AgentContext::from_request(&QueryRequest::default(), Utc::now());
        let errors = vec![AgentErrorEntry {
            agent: "weather".to_string(),
            error: "boom".to_string(),
        }];

        let prompt = build_llm_prompt("q", &ctx, None, None, None, 0.7, &[], &errors);
        assert!(prompt.contains("Some analyses incomplete due to: weather"));
    }
}
