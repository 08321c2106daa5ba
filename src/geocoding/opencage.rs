use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::Geocoder;
use crate::config::GeocodingConfig;
use crate::http::{build_client, read_json, redact};
use crate::models::GeocodeResult;
use crate::{LocalConnectError, Result};

const PROVIDER: &str = "OpenCage Geocoding";
const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// OpenCage geocoding client, asks for a single result only
pub struct OpenCageGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
    status: Option<OpenCageStatus>,
}

#[derive(Debug, Deserialize)]
struct OpenCageStatus {
    code: u16,
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    formatted: String,
    geometry: OpenCageGeometry,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

impl OpenCageGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocalConnectError::unavailable(PROVIDER, "OPENCAGE_API_KEY not set"))?;

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
            "{}?q={}&key={}&limit=1",
            self.base_url,
            urlencoding::encode(place_name),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl OpenCageResponse {
    fn into_top_match(self) -> Result<Option<GeocodeResult>> {
        if let Some(status) = &self.status {
            if status.code != 200 {
                return Err(LocalConnectError::provider_call(
                    PROVIDER,
                    format!("status {}: {}", status.code, status.message),
                ));
            }
        }

        Ok(self.results.into_iter().next().map(|result| GeocodeResult {
            latitude: result.geometry.lat,
            longitude: result.geometry.lng,
            formatted_address: result.formatted,
        }))
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn lookup(&self, place_name: &str) -> Result<Option<GeocodeResult>> {
        let url = self.request_url(place_name);
        debug!("Geocoding request: {}", redact(&url, &self.api_key));

        let response = self.client.get(&url).send().await?;
        let body: OpenCageResponse = read_json(PROVIDER, response).await?;

        body.into_top_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_match() {
        let response: OpenCageResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"formatted": "Durban, eThekwini, South Africa",
                     "geometry": {"lat": -29.8587, "lng": 31.0218}}
                ],
                "status": {"code": 200, "message": "OK"}
            }"#,
        )
        .unwrap();

        let result = response.into_top_match().unwrap().unwrap();
        assert_eq!(result.formatted_address, "Durban, eThekwini, South Africa");
        assert_eq!(result.longitude, 31.0218);
    }

    #[test]
    fn test_no_results_is_absent() {
        let response: OpenCageResponse =
            serde_json::from_str(r#"{"results": [], "status": {"code": 200, "message": "OK"}}"#)
                .unwrap();
        assert!(response.into_top_match().unwrap().is_none());
    }

    #[test]
    fn test_error_status() {
        let response: OpenCageResponse = serde_json::from_str(
            r#"{"results": [], "status": {"code": 402, "message": "quota exceeded"}}"#,
        )
        .unwrap();
        let err = response.into_top_match().unwrap_err();
        assert!(err.to_string().contains("402"));
    }

    #[test]
    fn test_request_url_limits_results() {
        let config = GeocodingConfig {
            api_key: Some("k".to_string()),
            ..GeocodingConfig::default()
        };
        let geocoder = OpenCageGeocoder::new(&config).unwrap();
        assert_eq!(
            geocoder.request_url("Port Elizabeth"),
            "https://api.opencagedata.com/geocode/v1/json?q=Port%20Elizabeth&key=k&limit=1"
        );
    }
}
