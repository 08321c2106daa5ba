//! Local service lookup
//!
//! Two tiers, evaluated in order: a live places search when a provider is
//! configured, then the built-in directory from the service catalog. A live
//! failure is treated the same as an empty live answer.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::catalog::ServiceTypeCatalog;
use crate::config::PlacesConfig;
use crate::models::{Coordinates, ServiceRecord};

pub mod google;

pub use google::GooglePlacesClient;

/// Location bias for a text search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBias {
    pub center: Coordinates,
    pub radius_meters: u32,
}

/// A live venue search backend
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Free-text venue search, results in provider order
    async fn text_search(
        &self,
        query: &str,
        bias: Option<SearchBias>,
    ) -> Result<Vec<ServiceRecord>>;
}

/// Run the live source if there is one; use the fallback when it is absent,
/// fails, or comes back empty
pub async fn try_live_then_fallback<T, Fut, F>(live: Option<Fut>, fallback: F) -> Vec<T>
where
    Fut: Future<Output = Result<Vec<T>>>,
    F: FnOnce() -> Vec<T>,
{
    if let Some(live) = live {
        match live.await {
            Ok(items) if !items.is_empty() => return items,
            Ok(_) => debug!("Live source returned no results, using fallback"),
            Err(e) => warn!("Live source failed, using fallback: {}", e),
        }
    }

    fallback()
}

/// Service search over an optional live provider and the catalog directory
#[derive(Clone)]
pub struct ServiceLookup {
    provider: Option<Arc<dyn PlacesProvider>>,
    catalog: Arc<ServiceTypeCatalog>,
    radius_meters: u32,
}

impl ServiceLookup {
    pub fn new(
        provider: Option<Arc<dyn PlacesProvider>>,
        catalog: Arc<ServiceTypeCatalog>,
        radius_meters: u32,
    ) -> Self {
        Self {
            provider,
            catalog,
            radius_meters,
        }
    }

    /// Lookup that only ever answers from the built-in directory
    pub fn fallback_only(catalog: Arc<ServiceTypeCatalog>) -> Self {
        Self::new(None, catalog, PlacesConfig::default().radius_meters)
    }

    /// Build from configuration; a missing key leaves only the directory
    pub fn from_config(config: &PlacesConfig, catalog: Arc<ServiceTypeCatalog>) -> Self {
        let provider: Option<Arc<dyn PlacesProvider>> = match GooglePlacesClient::new(config) {
            Ok(client) => {
                info!("Google Places client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("Places search unavailable, using built-in directory only: {}", e);
                None
            }
        };

        Self::new(provider, catalog, config.radius_meters)
    }

    pub fn has_live_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Venues for a service type near the given coordinates or place name
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        service_type: &str,
        coords: Option<Coordinates>,
        location_name: &str,
    ) -> Vec<ServiceRecord> {
        let bias = coords.map(|center| SearchBias {
            center,
            radius_meters: self.radius_meters,
        });

        let live = self.provider.as_ref().map(|provider| {
            info!("Searching '{}' via {}", service_type, provider.name());
            provider.text_search(service_type, bias)
        });

        let records = try_live_then_fallback(live, || {
            info!("Using built-in directory for '{}'", service_type);
            self.catalog.fallback_records(service_type, location_name)
        })
        .await;

        debug!("Found {} '{}' records", records.len(), service_type);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalConnectError;
    use std::sync::Mutex;

    /// Provider answering from a canned result and recording its calls
    struct CannedProvider {
        answer: Mutex<Option<Result<Vec<ServiceRecord>>>>,
        calls: Mutex<Vec<(String, Option<SearchBias>)>>,
    }

    impl CannedProvider {
        fn new(answer: Result<Vec<ServiceRecord>>) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(answer)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PlacesProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn text_search(
            &self,
            query: &str,
            bias: Option<SearchBias>,
        ) -> Result<Vec<ServiceRecord>> {
            self.calls.lock().unwrap().push((query.to_string(), bias));
            self.answer.lock().unwrap().take().unwrap_or(Ok(Vec::new()))
        }
    }

    fn lookup_with(provider: Arc<CannedProvider>) -> ServiceLookup {
        let provider: Arc<dyn PlacesProvider> = provider;
        ServiceLookup::new(Some(provider), ServiceTypeCatalog::built_in(), 5000)
    }

    #[tokio::test]
    async fn test_no_provider_returns_all_fallback_records() {
        let lookup = ServiceLookup::fallback_only(ServiceTypeCatalog::built_in());
        let records = lookup.search("dentist", None, "").await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Smile Dental Clinic", "City Centre Dental"]);
    }

    #[tokio::test]
    async fn test_fallback_filters_by_location_name() {
        let lookup = ServiceLookup::fallback_only(ServiceTypeCatalog::built_in());
        assert_eq!(lookup.search("dentist", None, "Cape Town").await.len(), 2);
        assert!(lookup.search("police station", None, "Durban").await.is_empty());
        assert!(lookup.search("plumber", None, "").await.is_empty());
    }

    #[tokio::test]
    async fn test_live_results_short_circuit_fallback() {
        let live = vec![ServiceRecord::rated("Live Dental", "1 Long St, Cape Town", 4.9)];
        let provider = CannedProvider::new(Ok(live.clone()));
        let lookup = lookup_with(Arc::clone(&provider));

        let coords = Coordinates::new(-33.9249, 18.4241);
        let records = lookup.search("dentist", Some(coords), "cape town").await;
        assert_eq!(records, live);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "dentist");
        assert_eq!(
            calls[0].1,
            Some(SearchBias {
                center: coords,
                radius_meters: 5000
            })
        );
    }

    #[tokio::test]
    async fn test_empty_live_results_fall_through() {
        let provider = CannedProvider::new(Ok(Vec::new()));
        let records = lookup_with(provider).search("restaurant", None, "").await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "The Gourmet Grill");
    }

    #[tokio::test]
    async fn test_live_failure_falls_through() {
        let provider = CannedProvider::new(Err(LocalConnectError::provider_call(
            "canned",
            "HTTP 500",
        )));
        let records = lookup_with(Arc::clone(&provider))
            .search("event", None, "durban")
            .await;
        assert_eq!(records.len(), 2);
        // no retry within a tier
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_bias_without_coordinates() {
        let provider = CannedProvider::new(Ok(Vec::new()));
        lookup_with(Arc::clone(&provider))
            .search("dentist", None, "")
            .await;
        assert_eq!(provider.calls.lock().unwrap()[0].1, None);
    }

    #[tokio::test]
    async fn test_combinator_without_live_source() {
        let live: Option<std::future::Ready<Result<Vec<u8>>>> = None;
        let items = try_live_then_fallback(live, || vec![1, 2]).await;
        assert_eq!(items, [1, 2]);
    }

    #[test]
    fn test_from_config_without_key() {
        let lookup =
            ServiceLookup::from_config(&PlacesConfig::default(), ServiceTypeCatalog::built_in());
        assert!(!lookup.has_live_provider());
    }
}
