use crate::models::SchemeDetail;

/// Resolve a scheme name from the crop database into its canonical details.
/// Procurement schemes interpolate the crop's MSP into the benefit line.
pub fn scheme_detail(scheme: &str, msp: Option<u32>) -> SchemeDetail {
    let msp_text = msp.map_or_else(|| "N/A".to_string(), |value| value.to_string());

    match scheme {
        "PM-KISAN" => SchemeDetail {
            name: "PM-KISAN".to_string(),
            benefit: "₹6000/year direct transfer".to_string(),
            eligibility: "All farmers".to_string(),
        },
        "PMFBY" => SchemeDetail {
            name: "Pradhan Mantri Fasal Bima Yojana".to_string(),
            benefit: "Crop insurance at 1.5-2% premium".to_string(),
            eligibility: "All farmers".to_string(),
        },
        "Paddy Procurement at MSP" => SchemeDetail {
            name: "Paddy MSP Procurement".to_string(),
            benefit: format!("Guaranteed MSP of ₹{msp_text}/quintal"),
            eligibility: "Registered farmers".to_string(),
        },
        "Wheat Procurement" => SchemeDetail {
            name: "Wheat MSP Procurement".to_string(),
            benefit: format!("Guaranteed MSP of ₹{msp_text}/quintal"),
            eligibility: "Registered farmers".to_string(),
        },
        "e-NAM" => SchemeDetail {
            name: "e-NAM (National Agriculture Market)".to_string(),
            benefit: "Online trading, better prices".to_string(),
            eligibility: "All farmers".to_string(),
        },
        "NAFED Procurement" => SchemeDetail {
            name: "NAFED Procurement".to_string(),
            benefit: format!("Procurement at MSP ₹{msp_text}/quintal"),
            eligibility: "Registered farmers".to_string(),
        },
        "Pulses Procurement" => SchemeDetail {
            name: "Pulses Procurement Scheme".to_string(),
            benefit: "Assured procurement at MSP".to_string(),
            eligibility: "Registered farmers".to_string(),
        },
        "Cotton Corporation of India Procurement" => SchemeDetail {
            name: "CCI Cotton Procurement".to_string(),
            benefit: format!("MSP of ₹{msp_text}/quintal"),
            eligibility: "Cotton farmers".to_string(),
        },
        "Sugar Development Fund" => SchemeDetail {
            name: "Sugar Development Fund".to_string(),
            benefit: "Loans for cane development".to_string(),
            eligibility: "Sugarcane farmers".to_string(),
        },
        "Cold Storage Subsidy" => SchemeDetail {
            name: "Cold Storage Subsidy Scheme".to_string(),
            benefit: "35-50% subsidy on cold storage".to_string(),
            eligibility: "FPOs, farmers".to_string(),
        },
        other => SchemeDetail {
            name: other.to_string(),
            benefit: "Various benefits".to_string(),
            eligibility: "Check with local office".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procurement_benefit_interpolates_msp() {
        let detail = scheme_detail("Paddy Procurement at MSP", Some(2300));
        assert!(detail.benefit.contains("2300"));
    }

    #[test]
    fn missing_msp_reads_not_available() {
        let detail = scheme_detail("NAFED Procurement", None);
        assert!(detail.benefit.contains("N/A"));
    }

    #[test]
    fn unknown_scheme_passes_through_with_generic_details() {
        let detail = scheme_detail("State Seed Subsidy", None);
        assert_eq!(detail.name, "State Seed Subsidy");
        assert_eq!(detail.eligibility, "Check with local office");
    }
}
