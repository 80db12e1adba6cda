use crate::models::{PriceRange, SoilType, WaterRequirement};

/// Per-hectare input costs in rupees.
#[derive(Debug, Clone, Copy)]
pub struct CropInputCosts {
    pub seeds: u32,
    pub fertilizers: u32,
    pub irrigation: u32,
    pub pesticides: u32,
}

impl CropInputCosts {
    pub const fn total(&self) -> u32 {
        self.seeds + self.fertilizers + self.irrigation + self.pesticides
    }
}

/// One crop-database entry. Varieties are grouped by trait so the planner
/// can pick drought-resistant or short-duration lines when conditions call
/// for them.
#[derive(Debug, Clone, Copy)]
pub struct CropInfo {
    pub name: &'static str,
    pub varieties: &'static [(&'static str, &'static [&'static str])],
    pub input_costs: CropInputCosts,
    pub expected_yield_kg_ha: u32,
    pub market_price_range: PriceRange,
    pub msp_2024: Option<u32>,
    pub suitable_soils: &'static [SoilType],
    pub water_requirement: WaterRequirement,
    pub government_schemes: &'static [&'static str],
    pub duration_months: u8,
}

impl CropInfo {
    pub fn varieties_of(&self, trait_name: &str) -> &'static [&'static str] {
        self.varieties
            .iter()
            .find(|(name, _)| *name == trait_name)
            .map_or(&[], |(_, names)| *names)
    }

    pub fn suits_soil(&self, soil_type: SoilType) -> bool {
        self.suitable_soils.contains(&soil_type)
    }
}

/// Crop database in ranking-priority order. The order is observable: crops
/// with tied confidence keep their database position after the stable sort.
pub static CROP_DATABASE: &[CropInfo] = &[
    CropInfo {
        name: "rice",
        varieties: &[
            ("high_yield", &["Pusa Basmati 1121", "IR-64", "Swarna"]),
            ("drought_resistant", &["Sahbhagi Dhan", "DRR 44"]),
            ("short_duration", &["Pusa 44", "PR 126"]),
        ],
        input_costs: CropInputCosts {
            seeds: 1500,
            fertilizers: 8000,
            irrigation: 15000,
            pesticides: 3000,
        },
        expected_yield_kg_ha: 4500,
        market_price_range: PriceRange { min: 2000, max: 2200 },
        msp_2024: Some(2300),
        suitable_soils: &[SoilType::Clay, SoilType::Loam, SoilType::Alluvial],
        water_requirement: WaterRequirement::High,
        government_schemes: &["PM-KISAN", "PMFBY", "Paddy Procurement at MSP"],
        duration_months: 4,
    },
    CropInfo {
        name: "wheat",
        varieties: &[
            ("high_yield", &["HD 3086", "PBW 725", "WH 1105"]),
            ("drought_resistant", &["HD 2987", "Raj 4120"]),
            ("disease_resistant", &["HD 3226", "DBW 187"]),
        ],
        input_costs: CropInputCosts {
            seeds: 2000,
            fertilizers: 6000,
            irrigation: 8000,
            pesticides: 2000,
        },
        expected_yield_kg_ha: 4000,
        market_price_range: PriceRange { min: 2100, max: 2400 },
        msp_2024: Some(2275),
        suitable_soils: &[SoilType::Loam, SoilType::Clay, SoilType::Alluvial],
        water_requirement: WaterRequirement::Moderate,
        government_schemes: &["PM-KISAN", "PMFBY", "Wheat Procurement"],
        duration_months: 5,
    },
    CropInfo {
        name: "maize",
        varieties: &[
            ("high_yield", &["HQPM 1", "Vivek QPM 9", "DHM 117"]),
            ("drought_resistant", &["PEHM 5", "Vivek 27"]),
            ("short_duration", &["HQPM 5", "Vivek 21"]),
        ],
        input_costs: CropInputCosts {
            seeds: 2500,
            fertilizers: 5000,
            irrigation: 6000,
            pesticides: 2500,
        },
        expected_yield_kg_ha: 5000,
        market_price_range: PriceRange { min: 1800, max: 2100 },
        msp_2024: Some(2090),
        suitable_soils: &[SoilType::Loam, SoilType::Sandy, SoilType::Alluvial],
        water_requirement: WaterRequirement::Moderate,
        government_schemes: &["PM-KISAN", "PMFBY", "e-NAM"],
        duration_months: 4,
    },
    CropInfo {
        name: "cotton",
        varieties: &[
            ("high_yield", &["RCH 2 BG II", "Bunny BG II", "Mallika BG II"]),
            ("drought_resistant", &["CICR 2", "Suraj"]),
            ("pest_resistant", &["Bt Cotton varieties"]),
        ],
        input_costs: CropInputCosts {
            seeds: 4000,
            fertilizers: 8000,
            irrigation: 10000,
            pesticides: 6000,
        },
        expected_yield_kg_ha: 2000,
        market_price_range: PriceRange { min: 6000, max: 7000 },
        msp_2024: Some(7020),
        suitable_soils: &[SoilType::BlackCotton, SoilType::Loam],
        water_requirement: WaterRequirement::Moderate,
        government_schemes: &[
            "PM-KISAN",
            "PMFBY",
            "Cotton Corporation of India Procurement",
        ],
        duration_months: 6,
    },
    CropInfo {
        name: "soybean",
        varieties: &[
            ("high_yield", &["JS 9560", "JS 20-34", "NRC 142"]),
            ("drought_resistant", &["NRC 86", "JS 335"]),
            ("disease_resistant", &["MACS 1407", "NRC 150"]),
        ],
        input_costs: CropInputCosts {
            seeds: 3000,
            fertilizers: 4000,
            irrigation: 4000,
            pesticides: 2000,
        },
        expected_yield_kg_ha: 2200,
        market_price_range: PriceRange { min: 4000, max: 4500 },
        msp_2024: Some(4600),
        suitable_soils: &[SoilType::Loam, SoilType::BlackCotton, SoilType::Alluvial],
        water_requirement: WaterRequirement::Moderate,
        government_schemes: &["PM-KISAN", "PMFBY", "NAFED Procurement"],
        duration_months: 4,
    },
    CropInfo {
        name: "groundnut",
        varieties: &[
            ("high_yield", &["TG 37A", "TAG 24", "GPBD 4"]),
            ("drought_resistant", &["ICGV 91114", "TG 26"]),
            ("high_oil", &["Girnar 3", "GJG 9"]),
        ],
        input_costs: CropInputCosts {
            seeds: 4000,
            fertilizers: 5000,
            irrigation: 5000,
            pesticides: 2000,
        },
        expected_yield_kg_ha: 2000,
        market_price_range: PriceRange { min: 5000, max: 5800 },
        msp_2024: Some(6377),
        suitable_soils: &[SoilType::Sandy, SoilType::Loam, SoilType::Red],
        water_requirement: WaterRequirement::Low,
        government_schemes: &["PM-KISAN", "PMFBY", "NAFED Procurement"],
        duration_months: 4,
    },
    CropInfo {
        name: "chickpea",
        varieties: &[
            ("high_yield", &["JG 14", "Vijay", "JAKI 9218"]),
            ("drought_resistant", &["JG 11", "Digvijay"]),
            ("disease_resistant", &["NBeG 47", "GNG 2144"]),
        ],
        input_costs: CropInputCosts {
            seeds: 3000,
            fertilizers: 3000,
            irrigation: 2000,
            pesticides: 1500,
        },
        expected_yield_kg_ha: 1800,
        market_price_range: PriceRange { min: 4500, max: 5500 },
        msp_2024: Some(5440),
        suitable_soils: &[SoilType::Loam, SoilType::BlackCotton, SoilType::Clay],
        water_requirement: WaterRequirement::Low,
        government_schemes: &["PM-KISAN", "PMFBY", "Pulses Procurement"],
        duration_months: 4,
    },
    CropInfo {
        name: "mustard",
        varieties: &[
            ("high_yield", &["Pusa Bold", "RH 749", "NRCDR 601"]),
            ("drought_resistant", &["NRCHB 101", "Kranti"]),
            ("early_maturing", &["Pusa Vijay", "RGN 229"]),
        ],
        input_costs: CropInputCosts {
            seeds: 1000,
            fertilizers: 4000,
            irrigation: 3000,
            pesticides: 1500,
        },
        expected_yield_kg_ha: 1500,
        market_price_range: PriceRange { min: 5000, max: 5800 },
        msp_2024: Some(5650),
        suitable_soils: &[SoilType::Loam, SoilType::Sandy, SoilType::Alluvial],
        water_requirement: WaterRequirement::Low,
        government_schemes: &["PM-KISAN", "PMFBY", "NAFED Procurement"],
        duration_months: 4,
    },
    CropInfo {
        name: "sugarcane",
        varieties: &[
            ("high_yield", &["Co 0238", "CoJ 85", "CoLK 94184"]),
            ("drought_resistant", &["Co 94012", "CoS 97261"]),
            ("high_sugar", &["Co 0118", "CoM 0265"]),
        ],
        input_costs: CropInputCosts {
            seeds: 8000,
            fertilizers: 12000,
            irrigation: 20000,
            pesticides: 4000,
        },
        expected_yield_kg_ha: 70000,
        market_price_range: PriceRange { min: 300, max: 400 },
        msp_2024: Some(315),
        suitable_soils: &[
            SoilType::Loam,
            SoilType::Clay,
            SoilType::Alluvial,
            SoilType::BlackCotton,
        ],
        water_requirement: WaterRequirement::VeryHigh,
        government_schemes: &["PM-KISAN", "Sugar Development Fund"],
        duration_months: 12,
    },
    CropInfo {
        name: "potato",
        varieties: &[
            ("high_yield", &["Kufri Jyoti", "Kufri Pukhraj", "Kufri Badshah"]),
            ("processing", &["Kufri Chipsona 1", "Kufri Frysona"]),
            ("disease_resistant", &["Kufri Khyati", "Kufri Himalini"]),
        ],
        input_costs: CropInputCosts {
            seeds: 25000,
            fertilizers: 8000,
            irrigation: 6000,
            pesticides: 4000,
        },
        expected_yield_kg_ha: 25000,
        market_price_range: PriceRange { min: 800, max: 1500 },
        msp_2024: None,
        suitable_soils: &[SoilType::Loam, SoilType::Sandy, SoilType::Alluvial],
        water_requirement: WaterRequirement::Moderate,
        government_schemes: &["PM-KISAN", "PMFBY", "Cold Storage Subsidy"],
        duration_months: 4,
    },
];

pub fn crop_info(name: &str) -> Option<&'static CropInfo> {
    CROP_DATABASE.iter().find(|crop| crop.name == name)
}

/// Minimum weather conditions a crop tolerates, used by the weather agent's
/// suitability screen.
#[derive(Debug, Clone, Copy)]
pub struct CropWeatherRequirement {
    pub crop: &'static str,
    pub temp_min: f64,
    pub temp_max: f64,
    pub rainfall_min: f64,
    pub humidity_min: f64,
    pub frost_tolerant: bool,
}

pub static CROP_WEATHER_REQUIREMENTS: &[CropWeatherRequirement] = &[
    CropWeatherRequirement { crop: "rice", temp_min: 20.0, temp_max: 35.0, rainfall_min: 1000.0, humidity_min: 70.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "wheat", temp_min: 10.0, temp_max: 25.0, rainfall_min: 50.0, humidity_min: 40.0, frost_tolerant: true },
    CropWeatherRequirement { crop: "maize", temp_min: 18.0, temp_max: 32.0, rainfall_min: 500.0, humidity_min: 50.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "cotton", temp_min: 20.0, temp_max: 35.0, rainfall_min: 600.0, humidity_min: 60.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "sugarcane", temp_min: 20.0, temp_max: 35.0, rainfall_min: 1200.0, humidity_min: 70.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "soybean", temp_min: 18.0, temp_max: 30.0, rainfall_min: 500.0, humidity_min: 60.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "groundnut", temp_min: 20.0, temp_max: 32.0, rainfall_min: 400.0, humidity_min: 50.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "chickpea", temp_min: 10.0, temp_max: 25.0, rainfall_min: 40.0, humidity_min: 35.0, frost_tolerant: true },
    CropWeatherRequirement { crop: "mustard", temp_min: 10.0, temp_max: 25.0, rainfall_min: 30.0, humidity_min: 40.0, frost_tolerant: true },
    CropWeatherRequirement { crop: "barley", temp_min: 8.0, temp_max: 22.0, rainfall_min: 40.0, humidity_min: 35.0, frost_tolerant: true },
    CropWeatherRequirement { crop: "millet", temp_min: 20.0, temp_max: 38.0, rainfall_min: 300.0, humidity_min: 40.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "sorghum", temp_min: 20.0, temp_max: 38.0, rainfall_min: 350.0, humidity_min: 45.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "potato", temp_min: 15.0, temp_max: 25.0, rainfall_min: 100.0, humidity_min: 60.0, frost_tolerant: false },
    CropWeatherRequirement { crop: "onion", temp_min: 15.0, temp_max: 30.0, rainfall_min: 50.0, humidity_min: 50.0, frost_tolerant: false },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crop_lookup_finds_database_entries() {
        let rice = crop_info("rice");
        assert!(rice.is_some());
        assert!(crop_info("quinoa").is_none());
    }

    #[test]
    fn rice_needs_irrigation_and_has_msp() {
        let rice = crop_info("rice").unwrap();
        assert!(rice.water_requirement.needs_irrigation());
        assert_eq!(rice.msp_2024, Some(2300));
        assert!(rice.suits_soil(SoilType::Clay));
        assert!(!rice.suits_soil(SoilType::Sandy));
    }

    #[test]
    fn variety_traits_resolve_by_name() {
        let wheat = crop_info("wheat").unwrap();
        assert_eq!(wheat.varieties_of("high_yield").len(), 3);
        assert!(wheat.varieties_of("high_sugar").is_empty());
    }

    #[test]
    fn total_input_cost_sums_components() {
        let rice = crop_info("rice").unwrap();
        assert_eq!(rice.input_costs.total(), 27500);
    }
}
