//! Venue records returned by the places lookup

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A single local service venue
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceRecord {
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    /// Only set for dated venues such as events
    pub date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ServiceRecord {
    /// Create a record with a rating
    #[must_use]
    pub fn rated(name: &str, address: &str, rating: f64) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            rating: Some(rating),
            date: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Create a record for a dated venue
    #[must_use]
    pub fn dated(name: &str, address: &str, date: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            rating: None,
            date: Some(date.to_string()),
            latitude: None,
            longitude: None,
        }
    }

    /// Case-insensitive substring match against the address
    #[must_use]
    pub fn address_mentions(&self, location_name: &str) -> bool {
        self.address
            .to_lowercase()
            .contains(&location_name.to_lowercase())
    }

    #[must_use]
    pub fn format_rating(&self) -> String {
        // Debug keeps the trailing ".0" on whole ratings
        self.rating
            .map_or_else(|| "N/A".to_string(), |rating| format!("{rating:?}"))
    }
}

impl Display for ServiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "- {}, Address: {}, Rating: {}",
            self.name,
            self.address,
            self.format_rating()
        )
    }
}
