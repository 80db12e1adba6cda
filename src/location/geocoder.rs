use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const GEOCODER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct NominatimSearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

/// Geocode an Indian pincode through Nominatim. The caller is responsible
/// for the ≥1 s politeness gap between directory calls.
pub async fn geocode_pincode(
    client: &reqwest::Client,
    base_url: &str,
    user_agent: &str,
    pincode: &str,
) -> Option<GeocodedPoint> {
    let url = format!("{}/search", base_url.trim_end_matches('/'));
    let query = format!("{pincode}, India");

    let response = match client
        .get(&url)
        .timeout(GEOCODER_TIMEOUT)
        .header(reqwest::header::USER_AGENT, user_agent)
        .query(&[
            ("q", query.as_str()),
            ("format", "json"),
            ("limit", "1"),
            ("countrycodes", "in"),
        ])
        .send()
        .await
    {
        Ok(response) => response,
        Err(error) => {
            warn!(pincode = pincode, error = %error, "Geocoding request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            pincode = pincode,
            status = response.status().as_u16(),
            "Geocoding request returned non-success status"
        );
        return None;
    }

    let results = match response.json::<Vec<NominatimSearchResult>>().await {
        Ok(results) => results,
        Err(error) => {
            warn!(pincode = pincode, error = %error, "Geocoding response did not parse");
            return None;
        }
    };

    let top = results.into_iter().next()?;
    let latitude = top.lat.parse::<f64>().ok()?;
    let longitude = top.lon.parse::<f64>().ok()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        warn!(pincode = pincode, "Geocoder returned out-of-range coordinates");
        return None;
    }

    info!(
        pincode = pincode,
        lat = latitude,
        lon = longitude,
        "Geocoded pincode"
    );

    Some(GeocodedPoint {
        latitude,
        longitude,
        display_name: top.display_name,
    })
}
