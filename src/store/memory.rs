use super::{
    observation_sort_key, pincode_partition, soil_partition, weather_partition,
    LearnedCoordinates, LearnedSoilProfile, LearningStore, PincodeLocation, RateLimitRecord,
    Season, WeatherObservation,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory learning store for local runs and tests. `unavailable()`
/// simulates a storage outage: every read is `None`, every write `false`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<(String, String), Value>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            unavailable: true,
        }
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, pk: &str, sk: &str) -> Option<T> {
        if self.unavailable {
            return None;
        }
        let items = self.items.read().await;
        let value = items.get(&(pk.to_string(), sk.to_string()))?;
        serde_json::from_value(value.clone()).ok()
    }

    async fn write<T: serde::Serialize>(&self, pk: &str, sk: &str, payload: &T) -> bool {
        if self.unavailable {
            return false;
        }
        let Ok(value) = serde_json::to_value(payload) else {
            return false;
        };
        let mut items = self.items.write().await;
        items.insert((pk.to_string(), sk.to_string()), value);
        true
    }

    /// Number of stored entries, handy for assertions.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl LearningStore for MemoryStore {
    async fn get_coordinates(&self, pincode: &str) -> Option<LearnedCoordinates> {
        self.read(&pincode_partition(pincode), "COORDS").await
    }

    async fn save_coordinates(&self, pincode: &str, coords: &LearnedCoordinates) -> bool {
        self.write(&pincode_partition(pincode), "COORDS", coords)
            .await
    }

    async fn get_location(&self, pincode: &str) -> Option<PincodeLocation> {
        self.read(&pincode_partition(pincode), "LOCATION").await
    }

    async fn save_location(&self, pincode: &str, location: &PincodeLocation) -> bool {
        self.write(&pincode_partition(pincode), "LOCATION", location)
            .await
    }

    async fn get_soil_profile(&self, region_key: &str) -> Option<LearnedSoilProfile> {
        self.read(&soil_partition(region_key), "PROFILE").await
    }

    async fn save_soil_profile(
        &self,
        region_key: &str,
        profile: &LearnedSoilProfile,
        _source: &str,
    ) -> bool {
        self.write(&soil_partition(region_key), "PROFILE", profile)
            .await
    }

    async fn get_weather_profile(
        &self,
        region_key: &str,
        season: Season,
    ) -> Option<WeatherObservation> {
        if self.unavailable {
            return None;
        }
        let prefix = format!("OBS#{}#", season.as_str());
        let pk = weather_partition(region_key);
        let items = self.items.read().await;
        items
            .iter()
            .filter(|((item_pk, sk), _)| *item_pk == pk && sk.starts_with(&prefix))
            .next_back()
            .and_then(|(_, value)| serde_json::from_value(value.clone()).ok())
    }

    async fn save_weather_observation(
        &self,
        region_key: &str,
        season: Season,
        observation: &WeatherObservation,
        observed_at: DateTime<Utc>,
    ) -> bool {
        self.write(
            &weather_partition(region_key),
            &observation_sort_key(season, observed_at),
            observation,
        )
        .await
    }

    async fn rate_limit_read(&self, pk: &str) -> Option<RateLimitRecord> {
        self.read(pk, "WINDOW").await
    }

    async fn rate_limit_write(&self, pk: &str, record: &RateLimitRecord, _ttl_epoch: i64) -> bool {
        self.write(pk, "WINDOW", record).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::SoilType;
    use chrono::TimeZone;

    #[tokio::test]
    async fn coordinates_round_trip() {
        let store = MemoryStore::new();
        let coords = LearnedCoordinates {
            latitude: 18.5204,
            longitude: 73.8567,
            source: "nominatim_geocoded".to_string(),
            display_name: Some("Pune, Maharashtra".to_string()),
        };

        assert!(store.save_coordinates("411001", &coords).await);
        assert_eq!(store.get_coordinates("411001").await, Some(coords));
        assert!(store.get_coordinates("560001").await.is_none());
    }

    #[tokio::test]
    async fn soil_profiles_key_by_region() {
        let store = MemoryStore::new();
        let profile = LearnedSoilProfile {
            soil_type: SoilType::BlackCotton,
            ph: 7.4,
            organic_matter: Some(0.5),
            nitrogen: Some(40.0),
            phosphorus: Some(22.0),
            potassium: Some(25.0),
            confidence: Some(0.8),
        };

        assert!(
            store
                .save_soil_profile("pune", &profile, "user_query_extracted")
                .await
        );
        assert_eq!(store.get_soil_profile("pune").await, Some(profile));
        assert!(store.get_soil_profile("nagpur").await.is_none());
    }

    #[tokio::test]
    async fn weather_observations_append_and_latest_wins() {
        let store = MemoryStore::new();
        let july = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let august = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();

        let first = WeatherObservation {
            temp_min: 24.0,
            temp_max: 33.0,
            rainfall: 750.0,
            humidity: 78.0,
            source: "open_meteo_live".to_string(),
        };
        let second = WeatherObservation {
            temp_max: 34.0,
            ..first.clone()
        };

        assert!(
            store
                .save_weather_observation("punjab", Season::Kharif, &first, july)
                .await
        );
        assert!(
            store
                .save_weather_observation("punjab", Season::Kharif, &second, august)
                .await
        );

        assert_eq!(store.len().await, 2);
        assert_eq!(
            store.get_weather_profile("punjab", Season::Kharif).await,
            Some(second)
        );
        assert!(
            store
                .get_weather_profile("punjab", Season::Rabi)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn unavailable_store_degrades_silently() {
        let store = MemoryStore::unavailable();
        let coords = LearnedCoordinates {
            latitude: 0.0,
            longitude: 0.0,
            source: "test".to_string(),
            display_name: None,
        };

        assert!(!store.save_coordinates("411001", &coords).await);
        assert!(store.get_coordinates("411001").await.is_none());
        assert!(
            !store
                .rate_limit_write(
                    "RATELIMIT#s#asr",
                    &RateLimitRecord {
                        request_count: 1,
                        window_start: 0
                    },
                    300
                )
                .await
        );
    }
}
