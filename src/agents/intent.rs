//! Intent routing: keyword scoring over the query text decides which
//! agents run. When nothing matches, every agent runs and the selection is
//! flagged as a default.

use super::round2;
use crate::knowledge::intents::{
    INTENT_CROP_PLANNING, INTENT_MARKET_INFO, INTENT_PATTERNS, INTENT_SOIL_ANALYSIS,
    INTENT_WEATHER_ANALYSIS,
};
use crate::models::{AgentKind, DetectedIntent, IntentAnalysis};
use std::collections::BTreeMap;
use tracing::debug;

/// Floor applied whenever at least one intent matched.
const MATCHED_CONFIDENCE_FLOOR: f64 = 0.6;

pub fn analyze(query: &str, previous_queries: &[String]) -> IntentAnalysis {
    let query_lower = query.to_lowercase();

    let mut detected_intents = BTreeMap::new();
    for pattern in INTENT_PATTERNS {
        let matched: Vec<String> = pattern
            .keywords
            .iter()
            .filter(|keyword| query_lower.contains(*keyword))
            .map(ToString::to_string)
            .collect();

        if !matched.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let score = matched.len() as f64 * pattern.weight;
            detected_intents.insert(
                pattern.name.to_string(),
                DetectedIntent {
                    score,
                    matched_keywords: matched,
                },
            );
        }
    }

    let mut agents = Vec::new();

    if detected_intents.contains_key(INTENT_SOIL_ANALYSIS) {
        include(&mut agents, AgentKind::Soil);
    }
    if detected_intents.contains_key(INTENT_WEATHER_ANALYSIS) {
        include(&mut agents, AgentKind::Weather);
    }
    if detected_intents.contains_key(INTENT_CROP_PLANNING)
        || detected_intents.contains_key(INTENT_MARKET_INFO)
    {
        // Crop planning consumes soil and weather context.
        include(&mut agents, AgentKind::CropPlanning);
        include(&mut agents, AgentKind::Soil);
        include(&mut agents, AgentKind::Weather);
    }

    // Carry continuity from the previous turn.
    if let Some(recent) = previous_queries.last() {
        let recent_lower = recent.to_lowercase();
        if recent_lower.contains("soil") {
            include(&mut agents, AgentKind::Soil);
        }
        if ["season", "weather", "kharif", "rabi"]
            .iter()
            .any(|keyword| recent_lower.contains(keyword))
        {
            include(&mut agents, AgentKind::Weather);
        }
    }

    let is_default_selection = detected_intents.is_empty();
    if agents.is_empty() {
        agents = vec![AgentKind::Soil, AgentKind::Weather, AgentKind::CropPlanning];
    }

    let total_score: f64 = detected_intents.values().map(|intent| intent.score).sum();
    #[allow(clippy::cast_precision_loss)]
    let max_possible = query.split_whitespace().count() as f64 * 0.5;
    // Relative signal only; the denominator is a heuristic, not a norm.
    let mut confidence = if max_possible > 0.0 {
        (total_score / max_possible).min(1.0)
    } else {
        0.5
    };
    if !detected_intents.is_empty() {
        confidence = confidence.max(MATCHED_CONFIDENCE_FLOOR);
    }

    debug!(
        agents = ?agents,
        confidence = confidence,
        default_selection = is_default_selection,
        "Intent analysis completed"
    );

    IntentAnalysis {
        agents,
        confidence: round2(confidence),
        detected_intents,
        is_default_selection,
    }
}

fn include(agents: &mut Vec<AgentKind>, agent: AgentKind) {
    if !agents.contains(&agent) {
        agents.push(agent);
    }
}
