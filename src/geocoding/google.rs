use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::Geocoder;
use crate::config::GeocodingConfig;
use crate::http::{build_client, read_json, redact};
use crate::models::GeocodeResult;
use crate::{LocalConnectError, Result};

const PROVIDER: &str = "Google Geocoding";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Geocoding API client
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeEntry>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocalConnectError::unavailable(PROVIDER, "GOOGLE_PLACES_API_KEY not set"))?;

        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn request_url(&self, place_name: &str) -> String {
        format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(place_name),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl GeocodeResponse {
    fn into_top_match(self) -> Result<Option<GeocodeResult>> {
        match self.status.as_str() {
            "OK" => Ok(self.results.into_iter().next().map(|entry| GeocodeResult {
                latitude: entry.geometry.location.lat,
                longitude: entry.geometry.location.lng,
                formatted_address: entry.formatted_address,
            })),
            "ZERO_RESULTS" => Ok(None),
            status => Err(LocalConnectError::provider_call(
                PROVIDER,
                format!(
                    "status {status}: {}",
                    self.error_message
                        .as_deref()
                        .unwrap_or("No error message provided")
                ),
            )),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn lookup(&self, place_name: &str) -> Result<Option<GeocodeResult>> {
        let url = self.request_url(place_name);
        debug!("Geocoding request: {}", redact(&url, &self.api_key));

        let response = self.client.get(&url).send().await?;
        let body: GeocodeResponse = read_json(PROVIDER, response).await?;

        body.into_top_match()
    }
}
