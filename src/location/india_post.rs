use crate::store::PincodeLocation;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice", default)]
    post_offices: Option<Vec<PostOfficeEntry>>,
}

#[derive(Debug, Deserialize)]
struct PostOfficeEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "Division", default)]
    division: Option<String>,
    #[serde(rename = "Region", default)]
    region: Option<String>,
    #[serde(rename = "Circle", default)]
    circle: Option<String>,
    #[serde(rename = "Block", default)]
    block: Option<String>,
}

/// Look a pincode up in the India Post directory. Any network, status, or
/// shape problem logs and returns `None`; the resolver moves on to the next
/// fallback.
pub async fn fetch_pincode_details(
    client: &reqwest::Client,
    base_url: &str,
    pincode: &str,
) -> Option<PincodeLocation> {
    let url = format!("{}/pincode/{pincode}", base_url.trim_end_matches('/'));

    let response = match client.get(&url).timeout(DIRECTORY_TIMEOUT).send().await {
        Ok(response) => response,
        Err(error) => {
            warn!(pincode = pincode, error = %error, "India Post directory request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            pincode = pincode,
            status = response.status().as_u16(),
            "India Post directory returned non-success status"
        );
        return None;
    }

    // The directory wraps its answer in a single-element array.
    let body = match response.json::<Vec<DirectoryResponse>>().await {
        Ok(body) => body,
        Err(error) => {
            warn!(pincode = pincode, error = %error, "India Post directory response did not parse");
            return None;
        }
    };

    let entry = body.into_iter().next()?;
    if !entry.status.eq_ignore_ascii_case("success") {
        info!(pincode = pincode, "India Post directory has no record for pincode");
        return None;
    }

    let offices = entry.post_offices.unwrap_or_default();
    let first = offices.first()?;

    let location = PincodeLocation {
        pincode: pincode.to_string(),
        state: first.state.clone().unwrap_or_default(),
        district: first.district.clone().unwrap_or_default(),
        division: first.division.clone(),
        region: first.region.clone(),
        circle: first.circle.clone(),
        block: first.block.clone(),
        post_offices: offices.iter().map(|office| office.name.clone()).collect(),
        primary_location: Some(first.name.clone()),
    };

    info!(
        pincode = pincode,
        district = location.district.as_str(),
        state = location.state.as_str(),
        "Learned pincode details from India Post"
    );

    Some(location)
}
