//! Live weather retrieval from the Open-Meteo forecast API. Any failure
//! returns `None` and the weather agent falls back to historical profiles.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const FORECAST_TIMEOUT: Duration = Duration::from_secs(5);
const FORECAST_DAYS: u8 = 7;
/// A 7-day precipitation total extrapolated to a monthly equivalent.
const WEEKLY_TO_MONTHLY_RAINFALL: f64 = 4.0;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
    #[serde(default)]
    daily: Option<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    precipitation: Option<f64>,
    weather_code: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
struct DailyForecast {
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
}

/// Live weather snapshot: current conditions plus forecast aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveWeather {
    pub current_temp: f64,
    pub current_humidity: f64,
    pub current_precipitation: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub rainfall: f64,
    pub humidity: f64,
    pub weather_code: i32,
    pub forecast_days: usize,
    pub fetched_at: DateTime<Utc>,
}

impl LiveWeather {
    pub const DATA_SOURCE: &'static str = "open_meteo_live";
}

/// Fetch current conditions and a 7-day forecast for the coordinates.
pub async fn fetch_live_weather(
    client: &reqwest::Client,
    base_url: &str,
    latitude: f64,
    longitude: f64,
) -> Option<LiveWeather> {
    let url = format!("{}/v1/forecast", base_url.trim_end_matches('/'));

    let response = match client
        .get(&url)
        .timeout(FORECAST_TIMEOUT)
        .query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m,precipitation,weather_code".to_string(),
            ),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max"
                    .to_string(),
            ),
            ("timezone", "Asia/Kolkata".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ])
        .send()
        .await
    {
        Ok(response) => response,
        Err(error) => {
            warn!(lat = latitude, lon = longitude, error = %error, "Weather API request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            lat = latitude,
            lon = longitude,
            status = response.status().as_u16(),
            "Weather API returned non-success status"
        );
        return None;
    }

    let forecast = match response.json::<ForecastResponse>().await {
        Ok(forecast) => forecast,
        Err(error) => {
            warn!(lat = latitude, lon = longitude, error = %error, "Weather API response did not parse");
            return None;
        }
    };

    let current = forecast.current.unwrap_or(CurrentConditions {
        temperature_2m: None,
        relative_humidity_2m: None,
        precipitation: None,
        weather_code: None,
    });
    let daily = forecast.daily.unwrap_or_default();

    let temp_min = mean(&daily.temperature_2m_min).unwrap_or(20.0);
    let temp_max = mean(&daily.temperature_2m_max).unwrap_or(30.0);
    let total_rainfall: f64 = daily.precipitation_sum.iter().sum();
    let humidity = current.relative_humidity_2m.unwrap_or(60.0);

    let live = LiveWeather {
        current_temp: current.temperature_2m.unwrap_or(25.0),
        current_humidity: humidity,
        current_precipitation: current.precipitation.unwrap_or(0.0),
        temp_min: round1(temp_min),
        temp_max: round1(temp_max),
        rainfall: round1(total_rainfall * WEEKLY_TO_MONTHLY_RAINFALL),
        humidity,
        weather_code: current.weather_code.unwrap_or(0),
        forecast_days: daily.temperature_2m_min.len(),
        fetched_at: Utc::now(),
    };

    info!(
        temp_min = live.temp_min,
        temp_max = live.temp_max,
        rainfall = live.rainfall,
        "Fetched live weather"
    );

    Some(live)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert!(mean(&[]).is_none());
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn rainfall_extrapolates_weekly_totals() {
        // 7 days at 10 mm/day → 70 mm/week → 280 mm monthly equivalent.
        let weekly = 70.0;
        assert!((weekly * WEEKLY_TO_MONTHLY_RAINFALL - 280.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_api_returns_none() {
        let client = reqwest::Client::new();
        let live = fetch_live_weather(&client, "http://127.0.0.1:9", 20.0, 78.0).await;
        assert!(live.is_none());
    }
}
