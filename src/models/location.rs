//! Location model for geographic coordinates and geocoding results

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as the `lat,lon` pair used in provider query strings
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Top match returned by a geocoding provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Provider's formatted address for the match
    pub formatted_address: String,
}

impl GeocodeResult {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Human-readable description embedded into LLM prompts
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Latitude: {}, Longitude: {}, Address: {}",
            self.latitude, self.longitude, self.formatted_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_query_value() {
        let coords = Coordinates::new(-26.2041, 28.0473);
        assert_eq!(coords.to_query_value(), "-26.2041,28.0473");
    }

    #[test]
    fn test_geocode_result_description() {
        let result = GeocodeResult {
            latitude: -33.9249,
            longitude: 18.4241,
            formatted_address: "Cape Town, South Africa".to_string(),
        };
        assert_eq!(
            result.describe(),
            "Latitude: -33.9249, Longitude: 18.4241, Address: Cape Town, South Africa"
        );
        assert_eq!(result.coordinates(), Coordinates::new(-33.9249, 18.4241));
    }
}
