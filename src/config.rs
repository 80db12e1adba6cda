use std::env;

/// Center-of-India fallback when no location signal resolves.
pub const DEFAULT_COORDINATES: (f64, f64) = (20.5937, 78.9629);

/// Runtime configuration, read once per composition root.
///
/// Every field has a code default so the core runs without any environment;
/// base URLs are overridable so tests can point external calls at an
/// unroutable port.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: String,
    pub learning_table: String,
    pub rate_limit_table: String,
    pub max_requests_per_hour: u32,
    pub rate_limit_window_seconds: i64,
    pub india_post_base_url: String,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub open_meteo_base_url: String,
    pub retrieval_api_url: Option<String>,
    pub default_coordinates: (f64, f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws_region: "ap-south-1".to_string(),
            learning_table: "farmer-learning-db".to_string(),
            rate_limit_table: "farmer-voice-rate-limits".to_string(),
            max_requests_per_hour: 5,
            rate_limit_window_seconds: 3600,
            india_post_base_url: "https://api.postalpincode.in".to_string(),
            geocoder_base_url: "https://nominatim.openstreetmap.org".to_string(),
            geocoder_user_agent: "farmer-advisory/0.1 (agri-assistant)".to_string(),
            open_meteo_base_url: "https://api.open-meteo.com".to_string(),
            retrieval_api_url: None,
            default_coordinates: DEFAULT_COORDINATES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            aws_region: env_or("AWS_REGION", &defaults.aws_region),
            learning_table: env_or("LEARNING_TABLE", &defaults.learning_table),
            rate_limit_table: env_or("RATE_LIMIT_TABLE", &defaults.rate_limit_table),
            max_requests_per_hour: env::var("MAX_REQUESTS_PER_HOUR")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.max_requests_per_hour),
            rate_limit_window_seconds: env::var("RATE_LIMIT_WINDOW_SECONDS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.rate_limit_window_seconds),
            india_post_base_url: env_or("INDIA_POST_BASE_URL", &defaults.india_post_base_url),
            geocoder_base_url: env_or("GEOCODER_BASE_URL", &defaults.geocoder_base_url),
            geocoder_user_agent: env_or("GEOCODER_USER_AGENT", &defaults.geocoder_user_agent),
            open_meteo_base_url: env_or("OPEN_METEO_BASE_URL", &defaults.open_meteo_base_url),
            retrieval_api_url: env::var("RETRIEVAL_API_URL")
                .ok()
                .filter(|value| !value.is_empty()),
            default_coordinates: defaults.default_coordinates,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config = Config::default();
        assert_eq!(config.max_requests_per_hour, 5);
        assert_eq!(config.rate_limit_window_seconds, 3600);
        assert_eq!(config.default_coordinates, DEFAULT_COORDINATES);
        assert!(config.retrieval_api_url.is_none());
    }
}
