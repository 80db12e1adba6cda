//! Persistent learning store: learned pincodes, locations, soil profiles,
//! weather observations, and rate-limit windows.
//!
//! The store is the only mutable shared state in the system. Every
//! operation is a full-item overwrite keyed by `(pk, sk)`, idempotent and
//! last-writer-wins. Callers must tolerate an unavailable store: reads
//! return `None`, writes return `false`, and the core degrades to static
//! profiles.

pub mod dynamo;
pub mod memory;

use crate::models::{Season, SoilType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Learned coordinate entries live a year; the upstream directories change
/// slowly and a stale centroid is still usable.
pub const COORDS_TTL_SECONDS: i64 = 365 * 24 * 3600;
/// Location payloads and soil profiles live two years.
pub const LOCATION_TTL_SECONDS: i64 = 2 * 365 * 24 * 3600;
pub const SOIL_PROFILE_TTL_SECONDS: i64 = 2 * 365 * 24 * 3600;
pub const WEATHER_OBS_TTL_SECONDS: i64 = 2 * 365 * 24 * 3600;

pub fn pincode_partition(pincode: &str) -> String {
    format!("PINCODE#{pincode}")
}

pub fn soil_partition(region_key: &str) -> String {
    format!("SOIL#{region_key}")
}

pub fn weather_partition(region_key: &str) -> String {
    format!("WEATHER#{region_key}")
}

pub fn rate_limit_partition(session_id: &str, kind: &str) -> String {
    format!("RATELIMIT#{session_id}#{kind}")
}

/// Sort key for one weather observation: append-only per season and month.
pub fn observation_sort_key(season: Season, observed_at: DateTime<Utc>) -> String {
    format!(
        "OBS#{}#{}",
        season.as_str(),
        observed_at.format("%Y-%m")
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnedCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    pub display_name: Option<String>,
}

/// Postal-directory payload learned for a pincode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PincodeLocation {
    pub pincode: String,
    pub state: String,
    pub district: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub circle: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub post_offices: Vec<String>,
    #[serde(default)]
    pub primary_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnedSoilProfile {
    pub soil_type: SoilType,
    pub ph: f64,
    #[serde(default)]
    pub organic_matter: Option<f64>,
    #[serde(default)]
    pub nitrogen: Option<f64>,
    #[serde(default)]
    pub phosphorus: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub temp_min: f64,
    pub temp_max: f64,
    pub rainfall: f64,
    pub humidity: f64,
    pub source: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub request_count: u32,
    pub window_start: i64,
}

/// Storage contract for learned data. All operations are best-effort:
/// implementations log failures and report them as absent reads or `false`
/// writes rather than erroring.
#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn get_coordinates(&self, pincode: &str) -> Option<LearnedCoordinates>;
    async fn save_coordinates(&self, pincode: &str, coords: &LearnedCoordinates) -> bool;

    async fn get_location(&self, pincode: &str) -> Option<PincodeLocation>;
    async fn save_location(&self, pincode: &str, location: &PincodeLocation) -> bool;

    async fn get_soil_profile(&self, region_key: &str) -> Option<LearnedSoilProfile>;
    async fn save_soil_profile(
        &self,
        region_key: &str,
        profile: &LearnedSoilProfile,
        source: &str,
    ) -> bool;

    /// Most recent stored observation for a region and season, if any.
    async fn get_weather_profile(
        &self,
        region_key: &str,
        season: Season,
    ) -> Option<WeatherObservation>;
    async fn save_weather_observation(
        &self,
        region_key: &str,
        season: Season,
        observation: &WeatherObservation,
        observed_at: DateTime<Utc>,
    ) -> bool;

    async fn rate_limit_read(&self, pk: &str) -> Option<RateLimitRecord>;
    async fn rate_limit_write(&self, pk: &str, record: &RateLimitRecord, ttl_epoch: i64) -> bool;
}

/// Pick the store implementation from `LEARNING_STORE_PROVIDER`
/// (`dynamo` by default; `memory` for local runs and tests).
pub async fn store_from_env(config: &crate::config::Config) -> Arc<dyn LearningStore> {
    let provider = std::env::var("LEARNING_STORE_PROVIDER").unwrap_or_default();

    if provider.eq_ignore_ascii_case("memory") {
        info!("Using in-memory learning store");
        return Arc::new(MemoryStore::new());
    }

    Arc::new(DynamoStore::from_env(config).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn partition_keys_follow_the_documented_layout() {
        assert_eq!(pincode_partition("411001"), "PINCODE#411001");
        assert_eq!(soil_partition("pune"), "SOIL#pune");
        assert_eq!(weather_partition("punjab"), "WEATHER#punjab");
        assert_eq!(
            rate_limit_partition("session-1", "asr"),
            "RATELIMIT#session-1#asr"
        );
    }

    #[test]
    fn observation_keys_append_by_season_and_month() {
        let when = Utc.with_ymd_and_hms(2024, 7, 14, 6, 0, 0).unwrap();
        assert_eq!(
            observation_sort_key(Season::Kharif, when),
            "OBS#kharif#2024-07"
        );
    }
}
