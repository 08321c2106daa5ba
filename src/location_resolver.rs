//! Location Resolution Module
//!
//! This module picks the place a query is about (the one named in the query,
//! else the one the caller supplied) and resolves it to coordinates when a
//! geocoder is available.

use std::sync::Arc;

use tracing::debug;

use crate::geocoding::Geocoder;
use crate::models::{Coordinates, GeocodeResult, is_explicit_location};

/// A location as far as it could be resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLocation {
    /// Place name as written by the user or caller
    pub text: Option<String>,
    /// Geocoder's top match, if the lookup succeeded
    pub geocoded: Option<GeocodeResult>,
}

impl ResolvedLocation {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.geocoded.as_ref().map(GeocodeResult::coordinates)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Text for the prompt's `location_info` slot
    #[must_use]
    pub fn description(&self) -> String {
        match &self.geocoded {
            Some(geocoded) => geocoded.describe(),
            None => self.name().to_string(),
        }
    }
}

/// Service for resolving location inputs
#[derive(Clone, Default)]
pub struct LocationResolver {
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl LocationResolver {
    pub fn new(geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        Self { geocoder }
    }

    /// The place a query refers to: the one named in the query wins over the
    /// caller's, and the `current_location` sentinel counts as no place
    #[must_use]
    pub fn effective_location(
        query_location: Option<&str>,
        caller_location: Option<&str>,
    ) -> Option<String> {
        query_location
            .filter(|location| is_explicit_location(location))
            .or_else(|| caller_location.filter(|location| is_explicit_location(location)))
            .map(str::to_string)
    }

    /// Geocode a place name if there is one; failures leave `geocoded` empty
    pub async fn resolve(&self, location: Option<String>) -> ResolvedLocation {
        let Some(text) = location else {
            return ResolvedLocation::default();
        };

        let geocoded = match &self.geocoder {
            Some(geocoder) => geocoder.geocode(&text).await,
            None => {
                debug!("No geocoder configured, keeping '{}' as text", text);
                None
            }
        };

        if geocoded.is_none() {
            debug!("Could not geocode '{}', using the original text", text);
        }

        ResolvedLocation {
            text: Some(text),
            geocoded,
        }
    }
}
