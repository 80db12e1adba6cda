/// Keyword pattern for one query intent. Scores are keyword hits times the
/// weight; crop planning weighs highest because it is usually the caller's
/// end goal.
#[derive(Debug, Clone, Copy)]
pub struct IntentPattern {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: f64,
}

pub const INTENT_SOIL_ANALYSIS: &str = "soil_analysis";
pub const INTENT_WEATHER_ANALYSIS: &str = "weather_analysis";
pub const INTENT_CROP_PLANNING: &str = "crop_planning";
pub const INTENT_MARKET_INFO: &str = "market_info";
pub const INTENT_PEST_DISEASE: &str = "pest_disease";

pub static INTENT_PATTERNS: &[IntentPattern] = &[
    IntentPattern {
        name: INTENT_SOIL_ANALYSIS,
        keywords: &[
            "soil", "ph", "clay", "sandy", "loam", "nitrogen", "phosphorus", "potassium", "npk",
            "fertile", "fertility", "land", "ground", "earth", "mitti", "organic matter",
            "micronutrient",
        ],
        weight: 1.0,
    },
    IntentPattern {
        name: INTENT_WEATHER_ANALYSIS,
        keywords: &[
            "weather", "rain", "rainfall", "season", "kharif", "rabi", "zaid", "temperature",
            "humidity", "monsoon", "winter", "summer", "climate", "frost", "drought", "flood",
            "irrigation",
        ],
        weight: 1.0,
    },
    IntentPattern {
        name: INTENT_CROP_PLANNING,
        keywords: &[
            "crop", "plant", "grow", "cultivate", "farm", "recommend", "suggest", "what to plant",
            "which crop", "best crop", "sow", "harvest", "yield", "variety", "seed", "profit",
            "income", "msp", "price",
        ],
        weight: 1.2,
    },
    IntentPattern {
        name: INTENT_MARKET_INFO,
        keywords: &[
            "price", "msp", "market", "sell", "income", "profit", "cost", "mandi", "procurement",
            "subsidy", "scheme", "loan",
        ],
        weight: 0.8,
    },
    IntentPattern {
        name: INTENT_PEST_DISEASE,
        keywords: &[
            "pest", "disease", "insect", "fungus", "virus", "blight", "rot", "spray", "pesticide",
            "medicine", "treatment",
        ],
        weight: 0.9,
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crop_planning_carries_the_highest_weight() {
        let max = INTENT_PATTERNS
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .unwrap();
        assert_eq!(max.name, INTENT_CROP_PLANNING);
    }
}
