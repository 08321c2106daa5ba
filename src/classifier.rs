//! Intent classification
//!
//! Rule-based routing of raw query text: catalog keywords decide whether the
//! query is a local service search, and two fixed patterns pull a place name
//! out of "in <place>" / "near <place>" phrasing.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::catalog::ServiceTypeCatalog;
use crate::models::{CURRENT_LOCATION, Intent, RouteDecision};

// Tried in order; the first match wins
static LOCATION_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"in\s+([a-zA-Z\s]+)").expect("static pattern"),
        Regex::new(r"near\s+([a-zA-Z\s]+)").expect("static pattern"),
    ]
});

/// Classifies query text into a [`RouteDecision`]
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    catalog: Arc<ServiceTypeCatalog>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(ServiceTypeCatalog::built_in())
    }
}

impl IntentClassifier {
    #[must_use]
    pub fn new(catalog: Arc<ServiceTypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Classify a query. Never fails; missing parts are `None`.
    #[must_use]
    pub fn classify(&self, query: &str) -> RouteDecision {
        let lowered = query.to_lowercase();

        let (intent, service_type) = match self.catalog.first_match(&lowered) {
            Some(service) => (Intent::SearchService, Some(service.label.to_string())),
            None => (Intent::GeneralQuery, None),
        };

        let location = extract_location(&lowered);

        debug!(
            "Classified query as {:?} (service: {:?}, location: {:?})",
            intent, service_type, location
        );

        RouteDecision {
            intent,
            service_type,
            location,
        }
    }
}

/// Place name from "in <place>" or "near <place>", else the sentinel for
/// "near me" / "here" phrasing
fn extract_location(lowered: &str) -> Option<String> {
    let found = LOCATION_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(lowered)
            .and_then(|captures| captures.get(1))
            .map(|place| place.as_str().trim().to_string())
    });

    if found.is_some() {
        return found;
    }

    if lowered.contains("near me") || lowered.contains("here") {
        return Some(CURRENT_LOCATION.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Police Station in Johannesburg", "police station")]
    #[case("is there a cop shop around", "police station")]
    #[case("I need a tooth doctor", "dentist")]
    #[case("Where can I find a good restaurant in Cape Town?", "restaurant")]
    #[case("any cafe open late", "restaurant")]
    #[case("concerts this weekend", "event")]
    fn test_service_keywords(#[case] query: &str, #[case] expected: &str) {
        let decision = IntentClassifier::default().classify(query);
        assert_eq!(decision.intent, Intent::SearchService);
        assert_eq!(decision.service_type.as_deref(), Some(expected));
    }

    #[rstest]
    #[case("Tell me about the weather")]
    #[case("What is the capital of France?")]
    fn test_general_queries(#[case] query: &str) {
        let decision = IntentClassifier::default().classify(query);
        assert_eq!(decision.intent, Intent::GeneralQuery);
        assert!(decision.service_type.is_none());
    }

    #[test]
    fn test_first_type_in_catalog_order_wins() {
        let decision = IntentClassifier::default().classify("dentist or restaurant?");
        assert_eq!(decision.service_type.as_deref(), Some("dentist"));
    }

    #[rstest]
    #[case("Police Station in Johannesburg", Some("johannesburg"))]
    #[case("restaurant in   Cape Town  ", Some("cape town"))]
    #[case("Where can I find a good restaurant in Cape Town?", Some("cape town"))]
    #[case("dentists near Rosebank", Some("rosebank"))]
    #[case("Tell me about the weather", None)]
    fn test_location_extraction(#[case] query: &str, #[case] expected: Option<&str>) {
        let decision = IntentClassifier::default().classify(query);
        assert_eq!(decision.location.as_deref(), expected);
    }

    #[test]
    fn test_in_pattern_takes_precedence_over_near() {
        let decision = IntentClassifier::default().classify("cafe near the park in durban");
        assert_eq!(decision.location.as_deref(), Some("durban"));
    }

    #[test]
    fn test_near_me_captures_literal_place() {
        // "near <words>" matches before the sentinel check is reached
        let decision = IntentClassifier::default().classify("Top-rated dentists near me");
        assert_eq!(decision.location.as_deref(), Some("me"));
    }

    #[test]
    fn test_here_sets_current_location_sentinel() {
        let decision = IntentClassifier::default().classify("any events here?");
        assert_eq!(decision.location.as_deref(), Some(CURRENT_LOCATION));
    }

    #[test]
    fn test_custom_catalog() {
        use crate::catalog::ServiceType;

        let catalog = ServiceTypeCatalog::new(vec![ServiceType {
            label: "plumber",
            keywords: &["plumber", "leaky pipe"],
            fallback: Vec::new(),
        }]);
        let classifier = IntentClassifier::new(Arc::new(catalog));

        let decision = classifier.classify("Help, I have a leaky pipe");
        assert_eq!(decision.service_type.as_deref(), Some("plumber"));
        assert!(!classifier.classify("dentist").is_service_search());
    }
}
