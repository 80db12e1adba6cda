//! Read-only reference data compiled into the binary. All tables are plain
//! statics, safe for concurrent readers without synchronization.

pub mod coordinates;
pub mod crops;
pub mod intents;
pub mod schemes;
pub mod soils;
pub mod weather;

pub use coordinates::{state_coordinates, static_pincode_coordinates};
pub use crops::{crop_info, CropInfo, CropWeatherRequirement, CROP_DATABASE, CROP_WEATHER_REQUIREMENTS};
pub use intents::{IntentPattern, INTENT_PATTERNS};
pub use schemes::scheme_detail;
pub use soils::{
    regional_soil_profile, soil_characteristics, RegionalSoilProfile, DEFAULT_SOIL_PROFILE,
    SOIL_TYPE_SYNONYMS,
};
pub use weather::{
    regional_weather_profile, season_dates, RegionalWeatherProfile, SeasonProfile,
    DEFAULT_WEATHER_PROFILE,
};

/// Normalize a district or state into the key space shared by the static
/// tables and the learning store: lowercase, whitespace runs become one
/// underscore.
pub fn region_key(region: &str) -> String {
    region
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_key_normalizes_case_and_spaces() {
        assert_eq!(region_key("West  Bengal"), "west_bengal");
        assert_eq!(region_key(" Punjab "), "punjab");
        assert_eq!(region_key("tamil nadu"), "tamil_nadu");
    }
}
