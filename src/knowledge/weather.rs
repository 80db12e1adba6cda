use crate::models::{RiskLevel, Season, SeasonDates};

/// Historical seasonal averages for one region.
#[derive(Debug, Clone, Copy)]
pub struct SeasonProfile {
    pub temp_min: f64,
    pub temp_max: f64,
    pub rainfall: f64,
    pub humidity: f64,
    pub frost_risk: RiskLevel,
}

#[derive(Debug, Clone, Copy)]
pub struct RegionalWeatherProfile {
    pub kharif: SeasonProfile,
    pub rabi: SeasonProfile,
    pub zaid: SeasonProfile,
}

impl RegionalWeatherProfile {
    /// Unknown seasons read the kharif baseline.
    pub const fn for_season(&self, season: Season) -> &SeasonProfile {
        match season {
            Season::Rabi => &self.rabi,
            Season::Zaid => &self.zaid,
            Season::Kharif | Season::Unknown => &self.kharif,
        }
    }
}

pub static REGIONAL_WEATHER_PROFILES: &[(&str, RegionalWeatherProfile)] = &[
    (
        "punjab",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 25.0, temp_max: 38.0, rainfall: 650.0, humidity: 70.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 5.0, temp_max: 22.0, rainfall: 80.0, humidity: 55.0, frost_risk: RiskLevel::Moderate },
            zaid: SeasonProfile { temp_min: 22.0, temp_max: 42.0, rainfall: 50.0, humidity: 45.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "maharashtra",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 22.0, temp_max: 32.0, rainfall: 1200.0, humidity: 80.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 12.0, temp_max: 28.0, rainfall: 50.0, humidity: 45.0, frost_risk: RiskLevel::Low },
            zaid: SeasonProfile { temp_min: 20.0, temp_max: 38.0, rainfall: 100.0, humidity: 50.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "rajasthan",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 26.0, temp_max: 40.0, rainfall: 350.0, humidity: 55.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 8.0, temp_max: 25.0, rainfall: 20.0, humidity: 35.0, frost_risk: RiskLevel::Moderate },
            zaid: SeasonProfile { temp_min: 25.0, temp_max: 45.0, rainfall: 30.0, humidity: 30.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "kerala",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 23.0, temp_max: 30.0, rainfall: 2500.0, humidity: 90.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 22.0, temp_max: 32.0, rainfall: 200.0, humidity: 65.0, frost_risk: RiskLevel::None },
            zaid: SeasonProfile { temp_min: 25.0, temp_max: 35.0, rainfall: 400.0, humidity: 75.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "west_bengal",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 24.0, temp_max: 34.0, rainfall: 1400.0, humidity: 85.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 10.0, temp_max: 25.0, rainfall: 50.0, humidity: 50.0, frost_risk: RiskLevel::Low },
            zaid: SeasonProfile { temp_min: 22.0, temp_max: 38.0, rainfall: 200.0, humidity: 70.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "uttar_pradesh",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 25.0, temp_max: 36.0, rainfall: 900.0, humidity: 75.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 6.0, temp_max: 22.0, rainfall: 60.0, humidity: 50.0, frost_risk: RiskLevel::Moderate },
            zaid: SeasonProfile { temp_min: 22.0, temp_max: 42.0, rainfall: 80.0, humidity: 45.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "tamil_nadu",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 24.0, temp_max: 35.0, rainfall: 400.0, humidity: 70.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 20.0, temp_max: 30.0, rainfall: 600.0, humidity: 75.0, frost_risk: RiskLevel::None },
            zaid: SeasonProfile { temp_min: 26.0, temp_max: 38.0, rainfall: 100.0, humidity: 60.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "karnataka",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 20.0, temp_max: 30.0, rainfall: 900.0, humidity: 80.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 15.0, temp_max: 28.0, rainfall: 100.0, humidity: 50.0, frost_risk: RiskLevel::Low },
            zaid: SeasonProfile { temp_min: 22.0, temp_max: 36.0, rainfall: 150.0, humidity: 55.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "madhya_pradesh",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 24.0, temp_max: 35.0, rainfall: 1100.0, humidity: 75.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 8.0, temp_max: 26.0, rainfall: 40.0, humidity: 45.0, frost_risk: RiskLevel::Moderate },
            zaid: SeasonProfile { temp_min: 24.0, temp_max: 42.0, rainfall: 60.0, humidity: 40.0, frost_risk: RiskLevel::None },
        },
    ),
    (
        "gujarat",
        RegionalWeatherProfile {
            kharif: SeasonProfile { temp_min: 25.0, temp_max: 35.0, rainfall: 700.0, humidity: 75.0, frost_risk: RiskLevel::None },
            rabi: SeasonProfile { temp_min: 12.0, temp_max: 28.0, rainfall: 30.0, humidity: 40.0, frost_risk: RiskLevel::Low },
            zaid: SeasonProfile { temp_min: 26.0, temp_max: 42.0, rainfall: 50.0, humidity: 45.0, frost_risk: RiskLevel::None },
        },
    ),
];

pub const DEFAULT_WEATHER_PROFILE: RegionalWeatherProfile = RegionalWeatherProfile {
    kharif: SeasonProfile { temp_min: 22.0, temp_max: 35.0, rainfall: 800.0, humidity: 75.0, frost_risk: RiskLevel::None },
    rabi: SeasonProfile { temp_min: 10.0, temp_max: 25.0, rainfall: 50.0, humidity: 45.0, frost_risk: RiskLevel::Low },
    zaid: SeasonProfile { temp_min: 25.0, temp_max: 40.0, rainfall: 200.0, humidity: 55.0, frost_risk: RiskLevel::None },
};

pub fn regional_weather_profile(region_key: &str) -> Option<&'static RegionalWeatherProfile> {
    REGIONAL_WEATHER_PROFILES
        .iter()
        .find(|(name, _)| *name == region_key)
        .map(|(_, profile)| profile)
}

/// Typical calendar windows per season.
pub const fn season_dates(season: Season) -> SeasonDates {
    match season {
        Season::Rabi => SeasonDates {
            start: "November 1",
            end: "March 31",
            sowing_window: "October-November",
        },
        Season::Zaid => SeasonDates {
            start: "March 15",
            end: "June 15",
            sowing_window: "March-April",
        },
        Season::Kharif | Season::Unknown => SeasonDates {
            start: "June 15",
            end: "October 15",
            sowing_window: "June-July",
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn punjab_rabi_carries_moderate_frost_risk() {
        let punjab = regional_weather_profile("punjab").unwrap();
        assert_eq!(punjab.for_season(Season::Rabi).frost_risk, RiskLevel::Moderate);
    }

    #[test]
    fn unknown_region_has_no_profile() {
        assert!(regional_weather_profile("narnia").is_none());
    }

    #[test]
    fn unknown_season_reads_kharif_dates() {
        assert_eq!(season_dates(Season::Unknown).start, "June 15");
    }
}
