use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{PlacesProvider, SearchBias};
use crate::config::PlacesConfig;
use crate::http::{build_client, read_json, redact};
use crate::models::ServiceRecord;
use crate::{LocalConnectError, Result};

const PROVIDER: &str = "Google Places";

/// Google Places text search client
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    formatted_address: String,
    rating: Option<f64>,
    geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: PlaceLocation,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    lat: f64,
    lng: f64,
}

impl From<PlaceResult> for ServiceRecord {
    fn from(place: PlaceResult) -> Self {
        let location = place.geometry.map(|geometry| geometry.location);
        ServiceRecord {
            name: place.name,
            address: place.formatted_address,
            rating: place.rating,
            date: None,
            latitude: location.as_ref().map(|l| l.lat),
            longitude: location.as_ref().map(|l| l.lng),
        }
    }
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocalConnectError::unavailable(PROVIDER, "GOOGLE_PLACES_API_KEY not set"))?;

        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            api_key,
            base_url: config.base_url.clone(),
        })
    }

    fn request_url(&self, query: &str, bias: Option<SearchBias>) -> String {
        let mut url = format!(
            "{}?query={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        );

        if let Some(bias) = bias {
            url.push_str(&format!(
                "&location={}&radius={}",
                urlencoding::encode(&bias.center.to_query_value()),
                bias.radius_meters
            ));
        }

        url
    }
}

impl TextSearchResponse {
    fn into_records(self) -> Result<Vec<ServiceRecord>> {
        match self.status.as_str() {
            "OK" => Ok(self.results.into_iter().map(ServiceRecord::from).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
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
impl PlacesProvider for GooglePlacesClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn text_search(
        &self,
        query: &str,
        bias: Option<SearchBias>,
    ) -> Result<Vec<ServiceRecord>> {
        let url = self.request_url(query, bias);
        debug!("Places request: {}", redact(&url, &self.api_key));

        let response = self.client.get(&url).send().await?;
        let body: TextSearchResponse = read_json(PROVIDER, response).await?;

        let records = body.into_records()?;
        info!("Found {} places for '{}'", records.len(), query);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn client() -> GooglePlacesClient {
        let config = PlacesConfig {
            api_key: Some("secret".to_string()),
            ..PlacesConfig::default()
        };
        GooglePlacesClient::new(&config).unwrap()
    }

    #[test]
    fn test_request_url_without_bias() {
        assert_eq!(
            client().request_url("police station", None),
            "https://maps.googleapis.com/maps/api/place/textsearch/json?query=police%20station&key=secret"
        );
    }

    #[test]
    fn test_request_url_with_bias() {
        let bias = SearchBias {
            center: Coordinates::new(-26.2041, 28.0473),
            radius_meters: 5000,
        };
        let url = client().request_url("dentist", Some(bias));
        assert!(url.ends_with("&location=-26.2041%2C28.0473&radius=5000"));
    }

    #[test]
    fn test_records_keep_provider_order() {
        let response: TextSearchResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {"name": "B Dental", "formatted_address": "2 Loop St, Cape Town", "rating": 4.1,
                     "geometry": {"location": {"lat": -33.92, "lng": 18.42}}},
                    {"name": "A Dental", "formatted_address": "1 Long St, Cape Town"}
                ]
            }"#,
        )
        .unwrap();

        let records = response.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "B Dental");
        assert_eq!(records[0].rating, Some(4.1));
        assert_eq!(records[0].latitude, Some(-33.92));
        assert_eq!(records[1].name, "A Dental");
        assert_eq!(records[1].rating, None);
        assert_eq!(records[1].longitude, None);
    }

    #[test]
    fn test_zero_results() {
        let response: TextSearchResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(response.into_records().unwrap().is_empty());
    }

    #[test]
    fn test_over_query_limit_is_error() {
        let response: TextSearchResponse = serde_json::from_str(
            r#"{"status": "OVER_QUERY_LIMIT", "results": [],
                "error_message": "You have exceeded your daily request quota for this API."}"#,
        )
        .unwrap();
        let err = response.into_records().unwrap_err();
        assert!(err.is_quota_exceeded());
    }
}
