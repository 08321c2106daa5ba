//! Geocoding providers
//!
//! Turns a free-text place name into coordinates. Every failure (missing
//! credential, HTTP error, provider status, bad body) collapses into an absent
//! result at the [`Geocoder::geocode`] boundary; callers never see an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::Result;
use crate::config::{GeocodingConfig, GeocodingProvider};
use crate::models::GeocodeResult;

pub mod google;
pub mod opencage;

pub use google::GoogleGeocoder;
pub use opencage::OpenCageGeocoder;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Query the provider for its top match
    async fn lookup(&self, place_name: &str) -> Result<Option<GeocodeResult>>;

    /// Top match for a place name, or `None` on any failure
    async fn geocode(&self, place_name: &str) -> Option<GeocodeResult> {
        match self.lookup(place_name).await {
            Ok(Some(result)) => {
                info!(
                    "Geocoded '{}' to {} ({:.4}, {:.4})",
                    place_name, result.formatted_address, result.latitude, result.longitude
                );
                Some(result)
            }
            Ok(None) => {
                warn!("{} found no match for '{}'", self.name(), place_name);
                None
            }
            Err(e) => {
                warn!("{} failed for '{}': {}", self.name(), place_name, e);
                None
            }
        }
    }
}

/// Construct the configured geocoder; `None` when disabled or unavailable
pub fn from_config(config: &GeocodingConfig) -> Option<Arc<dyn Geocoder>> {
    if !config.enabled {
        info!("Geocoding disabled by configuration");
        return None;
    }

    let geocoder: Result<Arc<dyn Geocoder>> = match config.provider {
        GeocodingProvider::Google => {
            GoogleGeocoder::new(config).map(|g| Arc::new(g) as Arc<dyn Geocoder>)
        }
        GeocodingProvider::OpenCage => {
            OpenCageGeocoder::new(config).map(|g| Arc::new(g) as Arc<dyn Geocoder>)
        }
    };

    match geocoder {
        Ok(geocoder) => {
            info!("{} geocoder initialized", geocoder.name());
            Some(geocoder)
        }
        Err(e) => {
            warn!("Geocoding unavailable: {}", e);
            None
        }
    }
}
