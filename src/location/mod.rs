//! Progressive location resolution with self-learning persistence.
//!
//! Resolution stops at the first hit: static pincode table → learned
//! coordinates → India Post directory + geocoder (persisting what it
//! learns) → static state centroid → country default. No step errors out
//! to the caller; external failures log and fall through.

pub mod geocoder;
pub mod india_post;

use crate::config::Config;
use crate::knowledge::{region_key, state_coordinates, static_pincode_coordinates};
use crate::models::FallbackLevel;
use crate::store::{LearnedCoordinates, LearningStore};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Nominatim asks for at most one request per second.
const GEOCODER_POLITENESS_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub fallback_level: FallbackLevel,
    pub confidence: f64,
    pub source: String,
    /// State and district learned during resolution, used to back-fill an
    /// incomplete query context.
    pub state: Option<String>,
    pub district: Option<String>,
}

impl ResolvedLocation {
    fn new(
        coordinates: (f64, f64),
        fallback_level: FallbackLevel,
        confidence: f64,
        source: String,
    ) -> Self {
        Self {
            latitude: coordinates.0,
            longitude: coordinates.1,
            fallback_level,
            confidence,
            source,
            state: None,
            district: None,
        }
    }
}

/// Resolve coordinates for the given location hints.
pub async fn resolve(
    client: &reqwest::Client,
    store: &dyn LearningStore,
    config: &Config,
    pincode: Option<&str>,
    state: Option<&str>,
) -> ResolvedLocation {
    if let Some(code) = pincode {
        if let Some(coords) = static_pincode_coordinates(code) {
            debug!(pincode = code, "Resolved pincode from static table");
            return ResolvedLocation::new(
                coords,
                FallbackLevel::StaticPincode,
                0.9,
                format!("pincode_{code}"),
            );
        }

        if let Some(learned) = store.get_coordinates(code).await {
            info!(pincode = code, "Resolved pincode from learning store");
            return ResolvedLocation::new(
                (learned.latitude, learned.longitude),
                FallbackLevel::LearnedPincode,
                0.85,
                format!("learned_pincode_{code}"),
            );
        }

        if let Some(resolved) = learn_pincode(client, store, config, code).await {
            return resolved;
        }
    }

    if let Some(name) = state {
        let key = region_key(name);
        if let Some(coords) = state_coordinates(&key) {
            return ResolvedLocation::new(
                coords,
                FallbackLevel::StaticState,
                0.6,
                format!("state_{key}"),
            );
        }
    }

    ResolvedLocation::new(
        config.default_coordinates,
        FallbackLevel::Default,
        0.3,
        "default_india".to_string(),
    )
}

/// Learn an unknown pincode through the India Post directory and the
/// geocoder, persisting both payloads. Returns `None` when neither
/// directory produced a usable position.
async fn learn_pincode(
    client: &reqwest::Client,
    store: &dyn LearningStore,
    config: &Config,
    pincode: &str,
) -> Option<ResolvedLocation> {
    let location =
        india_post::fetch_pincode_details(client, &config.india_post_base_url, pincode).await?;

    // Best-effort persistence; a failed write only costs a future lookup.
    if !store.save_location(pincode, &location).await {
        debug!(pincode = pincode, "Could not persist learned pincode location");
    }

    let learned_state = (!location.state.is_empty()).then(|| location.state.clone());
    let learned_district = (!location.district.is_empty()).then(|| location.district.clone());

    tokio::time::sleep(GEOCODER_POLITENESS_DELAY).await;

    if let Some(point) = geocoder::geocode_pincode(
        client,
        &config.geocoder_base_url,
        &config.geocoder_user_agent,
        pincode,
    )
    .await
    {
        let coords = LearnedCoordinates {
            latitude: point.latitude,
            longitude: point.longitude,
            source: "nominatim_geocoded".to_string(),
            display_name: point.display_name,
        };
        if !store.save_coordinates(pincode, &coords).await {
            debug!(pincode = pincode, "Could not persist learned coordinates");
        }

        let mut resolved = ResolvedLocation::new(
            (point.latitude, point.longitude),
            FallbackLevel::Live,
            0.9,
            format!("india_post_pincode_{pincode}"),
        );
        resolved.state = learned_state;
        resolved.district = learned_district;
        return Some(resolved);
    }

    // Geocoder missed; fall back to the centroid of the learned state.
    let state_key = learned_state.as_deref().map(region_key)?;
    let coords = state_coordinates(&state_key)?;

    info!(
        pincode = pincode,
        state = state_key.as_str(),
        "Geocoder unavailable, using learned state centroid"
    );

    let mut resolved = ResolvedLocation::new(
        coords,
        FallbackLevel::StaticState,
        0.6,
        format!("india_post_state_{state_key}"),
    );
    resolved.state = learned_state;
    resolved.district = learned_district;
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn offline_config() -> Config {
        Config {
            // Unroutable port: directory calls fail fast.
            india_post_base_url: "http://127.0.0.1:9".to_string(),
            geocoder_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn static_pincode_wins_without_network() {
        let store = MemoryStore::new();
        let config = offline_config();
        let client = reqwest::Client::new();

        let resolved = resolve(&client, &store, &config, Some("411001"), None).await;
        assert_eq!(resolved.fallback_level, FallbackLevel::StaticPincode);
        assert!((resolved.confidence - 0.9).abs() < f64::EPSILON);
        assert_eq!(resolved.source, "pincode_411001");
    }

    #[tokio::test]
    async fn learned_coordinates_rank_above_directories() {
        let store = MemoryStore::new();
        store
            .save_coordinates(
                "999001",
                &LearnedCoordinates {
                    latitude: 20.0,
                    longitude: 78.0,
                    source: "nominatim_geocoded".to_string(),
                    display_name: None,
                },
            )
            .await;

        let config = offline_config();
        let client = reqwest::Client::new();

        let resolved = resolve(&client, &store, &config, Some("999001"), None).await;
        assert_eq!(resolved.fallback_level, FallbackLevel::LearnedPincode);
        assert!((resolved.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_pincode_with_state_falls_back_to_state_centroid() {
        let store = MemoryStore::new();
        let config = offline_config();
        let client = reqwest::Client::new();

        let resolved = resolve(&client, &store, &config, Some("999999"), Some("Punjab")).await;
        assert_eq!(resolved.fallback_level, FallbackLevel::StaticState);
        assert!((resolved.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(resolved.source, "state_punjab");
    }

    #[tokio::test]
    async fn no_signal_resolves_to_country_default() {
        let store = MemoryStore::new();
        let config = offline_config();
        let client = reqwest::Client::new();

        let resolved = resolve(&client, &store, &config, None, None).await;
        assert_eq!(resolved.fallback_level, FallbackLevel::Default);
        assert!((resolved.confidence - 0.3).abs() < f64::EPSILON);
        assert!((resolved.latitude - 20.5937).abs() < 1e-9);
    }

    #[tokio::test]
    async fn dropping_the_pincode_never_raises_confidence() {
        let store = MemoryStore::new();
        let config = offline_config();
        let client = reqwest::Client::new();

        let with_pincode =
            resolve(&client, &store, &config, Some("141001"), Some("Punjab")).await;
        let without_pincode = resolve(&client, &store, &config, None, Some("Punjab")).await;

        assert!(without_pincode.confidence <= with_pincode.confidence);
    }
}
