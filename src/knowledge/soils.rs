use crate::models::{SoilCharacteristics, SoilType};

/// Qualitative behavior per soil type.
pub const fn soil_characteristics(soil_type: SoilType) -> SoilCharacteristics {
    match soil_type {
        SoilType::Clay => SoilCharacteristics {
            drainage: "poor",
            water_retention: "high",
            workability: "difficult",
            nutrient_retention: "high",
        },
        SoilType::Sandy => SoilCharacteristics {
            drainage: "excellent",
            water_retention: "low",
            workability: "easy",
            nutrient_retention: "low",
        },
        SoilType::Silt => SoilCharacteristics {
            drainage: "moderate",
            water_retention: "high",
            workability: "moderate",
            nutrient_retention: "good",
        },
        SoilType::Peat => SoilCharacteristics {
            drainage: "poor",
            water_retention: "very_high",
            workability: "moderate",
            nutrient_retention: "high",
        },
        SoilType::Chalk => SoilCharacteristics {
            drainage: "excellent",
            water_retention: "low",
            workability: "moderate",
            nutrient_retention: "low",
        },
        SoilType::BlackCotton => SoilCharacteristics {
            drainage: "poor",
            water_retention: "high",
            workability: "difficult",
            nutrient_retention: "high",
        },
        SoilType::Red => SoilCharacteristics {
            drainage: "good",
            water_retention: "moderate",
            workability: "moderate",
            nutrient_retention: "moderate",
        },
        SoilType::Laterite => SoilCharacteristics {
            drainage: "excellent",
            water_retention: "low",
            workability: "easy",
            nutrient_retention: "low",
        },
        SoilType::Alluvial => SoilCharacteristics {
            drainage: "good",
            water_retention: "moderate",
            workability: "easy",
            nutrient_retention: "high",
        },
        // Loam doubles as the unknown-soil default.
        SoilType::Loam | SoilType::Unknown => SoilCharacteristics {
            drainage: "good",
            water_retention: "moderate",
            workability: "easy",
            nutrient_retention: "good",
        },
    }
}

/// Regional baseline when no soil data arrives with the query.
#[derive(Debug, Clone, Copy)]
pub struct RegionalSoilProfile {
    pub soil_type: SoilType,
    pub ph: f64,
    pub fertility: &'static str,
    pub organic_matter: f64,
}

pub static REGIONAL_SOIL_PROFILES: &[(&str, RegionalSoilProfile)] = &[
    ("punjab", RegionalSoilProfile { soil_type: SoilType::Loam, ph: 7.8, fertility: "high", organic_matter: 0.6 }),
    ("maharashtra", RegionalSoilProfile { soil_type: SoilType::BlackCotton, ph: 7.5, fertility: "medium", organic_matter: 0.5 }),
    ("rajasthan", RegionalSoilProfile { soil_type: SoilType::Sandy, ph: 8.2, fertility: "low", organic_matter: 0.3 }),
    ("kerala", RegionalSoilProfile { soil_type: SoilType::Laterite, ph: 5.5, fertility: "medium", organic_matter: 0.7 }),
    ("west_bengal", RegionalSoilProfile { soil_type: SoilType::Alluvial, ph: 6.8, fertility: "high", organic_matter: 0.8 }),
    ("tamil_nadu", RegionalSoilProfile { soil_type: SoilType::Red, ph: 6.5, fertility: "medium", organic_matter: 0.5 }),
    ("karnataka", RegionalSoilProfile { soil_type: SoilType::Red, ph: 6.8, fertility: "medium", organic_matter: 0.5 }),
    ("uttar_pradesh", RegionalSoilProfile { soil_type: SoilType::Alluvial, ph: 7.2, fertility: "high", organic_matter: 0.6 }),
    ("madhya_pradesh", RegionalSoilProfile { soil_type: SoilType::BlackCotton, ph: 7.6, fertility: "medium", organic_matter: 0.5 }),
    ("gujarat", RegionalSoilProfile { soil_type: SoilType::BlackCotton, ph: 7.8, fertility: "medium", organic_matter: 0.4 }),
];

pub const DEFAULT_SOIL_PROFILE: RegionalSoilProfile = RegionalSoilProfile {
    soil_type: SoilType::Loam,
    ph: 7.0,
    fertility: "medium",
    organic_matter: 0.5,
};

pub fn regional_soil_profile(region_key: &str) -> Option<&'static RegionalSoilProfile> {
    REGIONAL_SOIL_PROFILES
        .iter()
        .find(|(name, _)| *name == region_key)
        .map(|(_, profile)| profile)
}

/// Query-text synonyms per soil type. First match wins.
pub static SOIL_TYPE_SYNONYMS: &[(SoilType, &[&str])] = &[
    (SoilType::Clay, &["clay", "clayey", "heavy soil"]),
    (SoilType::Sandy, &["sandy", "sand", "light soil"]),
    (SoilType::Loam, &["loam", "loamy"]),
    (SoilType::Silt, &["silt", "silty"]),
    (SoilType::Peat, &["peat", "peaty", "organic soil"]),
    (SoilType::Chalk, &["chalk", "chalky", "calcareous"]),
    (
        SoilType::BlackCotton,
        &["black cotton", "black soil", "regur", "vertisol"],
    ),
    (SoilType::Red, &["red soil", "red earth", "alfisol"]),
    (SoilType::Laterite, &["laterite", "lateritic"]),
    (SoilType::Alluvial, &["alluvial", "river soil", "doab"]),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn regional_profiles_resolve_known_states() {
        let punjab = regional_soil_profile("punjab").unwrap();
        assert_eq!(punjab.soil_type, SoilType::Loam);
        assert!(regional_soil_profile("atlantis").is_none());
    }

    #[test]
    fn unknown_soil_falls_back_to_loam_characteristics() {
        assert_eq!(
            soil_characteristics(SoilType::Unknown),
            soil_characteristics(SoilType::Loam)
        );
    }
}
