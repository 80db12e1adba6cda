use super::{
    observation_sort_key, pincode_partition, soil_partition, weather_partition,
    LearnedCoordinates, LearnedSoilProfile, LearningStore, PincodeLocation, RateLimitRecord,
    Season, WeatherObservation, COORDS_TTL_SECONDS, LOCATION_TTL_SECONDS,
    SOIL_PROFILE_TTL_SECONDS, WEATHER_OBS_TTL_SECONDS,
};
use crate::config::Config;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

/// DynamoDB-backed learning store. Entries are full-item puts keyed by
/// `(pk, sk)` with a `ttl` attribute the table expires on its own.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    learning_table: String,
    rate_limit_table: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredItem<T> {
    pk: String,
    sk: String,
    #[serde(flatten)]
    payload: T,
    source: Option<String>,
    created_at: String,
    ttl: i64,
}

impl DynamoStore {
    pub async fn from_env(config: &Config) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;

        Self {
            client: aws_sdk_dynamodb::Client::new(&aws_config),
            learning_table: config.learning_table.clone(),
            rate_limit_table: config.rate_limit_table.clone(),
        }
    }

    pub fn new(
        client: aws_sdk_dynamodb::Client,
        learning_table: String,
        rate_limit_table: String,
    ) -> Self {
        Self {
            client,
            learning_table,
            rate_limit_table,
        }
    }

    async fn read_item<T: DeserializeOwned>(&self, table: &str, pk: &str, sk: &str) -> Option<T> {
        let response = self
            .client
            .get_item()
            .table_name(table)
            .key("pk", AttributeValue::S(pk.to_string()))
            .key("sk", AttributeValue::S(sk.to_string()))
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(error) => {
                warn!(pk = pk, sk = sk, error = %error, "Learning store read failed");
                return None;
            }
        };

        let item = output.item?;
        match serde_dynamo::from_item::<_, StoredItem<T>>(item) {
            Ok(stored) => Some(stored.payload),
            Err(error) => {
                warn!(pk = pk, sk = sk, error = %error, "Learning store item did not deserialize");
                None
            }
        }
    }

    async fn write_item<T: Serialize>(
        &self,
        table: &str,
        pk: &str,
        sk: &str,
        payload: &T,
        source: Option<&str>,
        ttl_seconds: i64,
    ) -> bool {
        let stored = StoredItem {
            pk: pk.to_string(),
            sk: sk.to_string(),
            payload,
            source: source.map(ToString::to_string),
            created_at: Utc::now().to_rfc3339(),
            ttl: Utc::now().timestamp() + ttl_seconds,
        };

        let item = match serde_dynamo::to_item(&stored) {
            Ok(item) => item,
            Err(error) => {
                warn!(pk = pk, sk = sk, error = %error, "Learning store item did not serialize");
                return false;
            }
        };

        match self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
        {
            Ok(_) => true,
            Err(error) => {
                warn!(pk = pk, sk = sk, error = %error, "Learning store write failed");
                false
            }
        }
    }
}

#[async_trait]
impl LearningStore for DynamoStore {
    async fn get_coordinates(&self, pincode: &str) -> Option<LearnedCoordinates> {
        self.read_item(&self.learning_table, &pincode_partition(pincode), "COORDS")
            .await
    }

    async fn save_coordinates(&self, pincode: &str, coords: &LearnedCoordinates) -> bool {
        self.write_item(
            &self.learning_table,
            &pincode_partition(pincode),
            "COORDS",
            coords,
            Some(coords.source.as_str()),
            COORDS_TTL_SECONDS,
        )
        .await
    }

    async fn get_location(&self, pincode: &str) -> Option<PincodeLocation> {
        self.read_item(&self.learning_table, &pincode_partition(pincode), "LOCATION")
            .await
    }

    async fn save_location(&self, pincode: &str, location: &PincodeLocation) -> bool {
        self.write_item(
            &self.learning_table,
            &pincode_partition(pincode),
            "LOCATION",
            location,
            Some("india_post"),
            LOCATION_TTL_SECONDS,
        )
        .await
    }

    async fn get_soil_profile(&self, region_key: &str) -> Option<LearnedSoilProfile> {
        self.read_item(&self.learning_table, &soil_partition(region_key), "PROFILE")
            .await
    }

    async fn save_soil_profile(
        &self,
        region_key: &str,
        profile: &LearnedSoilProfile,
        source: &str,
    ) -> bool {
        self.write_item(
            &self.learning_table,
            &soil_partition(region_key),
            "PROFILE",
            profile,
            Some(source),
            SOIL_PROFILE_TTL_SECONDS,
        )
        .await
    }

    async fn get_weather_profile(
        &self,
        region_key: &str,
        season: Season,
    ) -> Option<WeatherObservation> {
        let response = self
            .client
            .query()
            .table_name(&self.learning_table)
            .key_condition_expression("pk = :pk AND begins_with(sk, :prefix)")
            .expression_attribute_values(
                ":pk",
                AttributeValue::S(weather_partition(region_key)),
            )
            .expression_attribute_values(
                ":prefix",
                AttributeValue::S(format!("OBS#{}#", season.as_str())),
            )
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(error) => {
                warn!(region = region_key, error = %error, "Weather observation query failed");
                return None;
            }
        };

        let item = output.items.and_then(|items| items.into_iter().next())?;
        serde_dynamo::from_item::<_, StoredItem<WeatherObservation>>(item)
            .map(|stored| stored.payload)
            .ok()
    }

    async fn save_weather_observation(
        &self,
        region_key: &str,
        season: Season,
        observation: &WeatherObservation,
        observed_at: DateTime<Utc>,
    ) -> bool {
        self.write_item(
            &self.learning_table,
            &weather_partition(region_key),
            &observation_sort_key(season, observed_at),
            observation,
            Some(observation.source.as_str()),
            WEATHER_OBS_TTL_SECONDS,
        )
        .await
    }

    async fn rate_limit_read(&self, pk: &str) -> Option<RateLimitRecord> {
        let response = self
            .client
            .get_item()
            .table_name(&self.rate_limit_table)
            .key("pk", AttributeValue::S(pk.to_string()))
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(error) => {
                warn!(pk = pk, error = %error, "Rate limit read failed");
                return None;
            }
        };

        let item = output.item?;
        let count = item
            .get("request_count")
            .and_then(|value| value.as_n().ok())
            .and_then(|value| value.parse().ok())?;
        let window_start = item
            .get("window_start")
            .and_then(|value| value.as_n().ok())
            .and_then(|value| value.parse().ok())?;

        Some(RateLimitRecord {
            request_count: count,
            window_start,
        })
    }

    async fn rate_limit_write(&self, pk: &str, record: &RateLimitRecord, ttl_epoch: i64) -> bool {
        match self
            .client
            .put_item()
            .table_name(&self.rate_limit_table)
            .item("pk", AttributeValue::S(pk.to_string()))
            .item(
                "request_count",
                AttributeValue::N(record.request_count.to_string()),
            )
            .item(
                "window_start",
                AttributeValue::N(record.window_start.to_string()),
            )
            .item("ttl", AttributeValue::N(ttl_epoch.to_string()))
            .send()
            .await
        {
            Ok(_) => true,
            Err(error) => {
                warn!(pk = pk, error = %error, "Rate limit write failed");
                false
            }
        }
    }
}
