//! Property tests over the intent router: whatever the query looks like,
//! the routing output stays well-formed.

use farmer_advisory::agents::intent;
use proptest::prelude::*;

proptest! {
    #[test]
    fn confidence_is_always_a_valid_fraction(query in ".{0,200}") {
        let analysis = intent::analyze(&query, &[]);
        prop_assert!((0.0..=1.0).contains(&analysis.confidence));
    }

    #[test]
    fn at_least_one_agent_is_always_selected(query in ".{0,200}") {
        let analysis = intent::analyze(&query, &[]);
        prop_assert!(!analysis.agents.is_empty());
        prop_assert!(analysis.agents.len() <= 3);
    }

    #[test]
    fn agents_are_unique(query in "[a-z ]{0,120}") {
        let analysis = intent::analyze(&query, &[]);
        let mut deduped = analysis.agents.clone();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), analysis.agents.len());
    }

    #[test]
    fn matched_intents_floor_the_confidence(extra in "[a-z ]{0,60}") {
        let query = format!("which crop to grow {extra}");
        let analysis = intent::analyze(&query, &[]);
        prop_assert!(analysis.confidence >= 0.6);
    }

    #[test]
    fn default_selection_flag_tracks_detected_intents(query in "[a-z ]{0,120}") {
        let analysis = intent::analyze(&query, &[]);
        prop_assert_eq!(analysis.is_default_selection, analysis.detected_intents.is_empty());
    }
}
