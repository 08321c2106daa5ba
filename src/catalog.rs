//! Service type catalog
//!
//! Static, ordered table of the local service categories the assistant knows
//! about: the keywords that trigger each category and the built-in venues
//! used when no live search result is available.

use std::sync::{Arc, LazyLock};

use crate::models::ServiceRecord;

/// One searchable category of local venue
#[derive(Debug, Clone)]
pub struct ServiceType {
    /// Canonical label, also used as the free-text search query
    pub label: &'static str,
    /// Lower-case substrings that select this category
    pub keywords: &'static [&'static str],
    /// Built-in venues, in display order
    pub fallback: Vec<ServiceRecord>,
}

impl ServiceType {
    /// Whether any keyword occurs in the already lower-cased text
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(*keyword))
    }
}

/// Read-only catalog of service types; order decides ties between categories
#[derive(Debug, Clone)]
pub struct ServiceTypeCatalog {
    types: Vec<ServiceType>,
}

static BUILT_IN: LazyLock<Arc<ServiceTypeCatalog>> = LazyLock::new(|| {
    Arc::new(ServiceTypeCatalog {
        types: vec![
            ServiceType {
                label: "police station",
                keywords: &["police station", "cop shop", "saps"],
                fallback: vec![
                    ServiceRecord::rated(
                        "Johannesburg Central Police Station",
                        "123 Main St, Johannesburg",
                        4.0,
                    ),
                    ServiceRecord::rated("Rosebank Police Station", "45 Oxford Rd, Rosebank", 3.8),
                ],
            },
            ServiceType {
                label: "dentist",
                keywords: &["dentist", "dental clinic", "tooth doctor"],
                fallback: vec![
                    ServiceRecord::rated("Smile Dental Clinic", "789 Oak Ave, Cape Town", 4.5),
                    ServiceRecord::rated("City Centre Dental", "101 Pine St, Cape Town", 4.2),
                ],
            },
            ServiceType {
                label: "restaurant",
                keywords: &["restaurant", "eatery", "cafe", "food"],
                fallback: vec![
                    ServiceRecord::rated("The Gourmet Grill", "1 Broadway, Johannesburg", 4.7),
                    ServiceRecord::rated("Italian Trattoria", "2 High St, Johannesburg", 4.1),
                ],
            },
            ServiceType {
                label: "event",
                keywords: &["event", "show", "festival", "concert"],
                fallback: vec![
                    ServiceRecord::dated("Jazz Festival", "Park Square, Durban", "2025-08-10"),
                    ServiceRecord::dated(
                        "Tech Conference",
                        "Convention Centre, Durban",
                        "2025-09-20",
                    ),
                ],
            },
        ],
    })
});

impl ServiceTypeCatalog {
    /// The catalog compiled into the binary
    #[must_use]
    pub fn built_in() -> Arc<ServiceTypeCatalog> {
        Arc::clone(&BUILT_IN)
    }

    /// Build a custom catalog, mostly for tests and embedding
    #[must_use]
    pub fn new(types: Vec<ServiceType>) -> Self {
        Self { types }
    }

    /// Service types in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ServiceType> {
        self.types.iter()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ServiceType> {
        self.types.iter().find(|service| service.label == label)
    }

    /// First service type, in catalog order, with a keyword in `lowered`
    #[must_use]
    pub fn first_match(&self, lowered: &str) -> Option<&ServiceType> {
        self.types.iter().find(|service| service.matches(lowered))
    }

    /// Built-in venues for a type, optionally narrowed to an address substring
    #[must_use]
    pub fn fallback_records(&self, label: &str, location_name: &str) -> Vec<ServiceRecord> {
        let Some(service) = self.get(label) else {
            return Vec::new();
        };

        service
            .fallback
            .iter()
            .filter(|record| location_name.is_empty() || record.address_mentions(location_name))
            .cloned()
            .collect()
    }
}
