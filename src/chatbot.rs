//! Query handling: classify, resolve the location, then answer from the
//! service lookup or the language model

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::catalog::ServiceTypeCatalog;
use crate::classifier::IntentClassifier;
use crate::config::LocalConnectConfig;
use crate::llm::{self, CompletionModel, PromptTemplate};
use crate::location_resolver::LocationResolver;
use crate::models::{CURRENT_LOCATION, Query, RouteDecision, ServiceRecord};
use crate::places::ServiceLookup;
use crate::{Result, geocoding};

pub const NOT_INITIALIZED_MESSAGE: &str =
    "I'm sorry, the AI service is not properly initialized. Please check backend logs.";

pub const QUOTA_EXCEEDED_MESSAGE: &str = "I'm sorry, the Google API quota has been exceeded or billing is not set up. Please check your Google Cloud Console.";

/// The assistant behind `process_query`
#[derive(Clone)]
pub struct LocalConnectChatbot {
    classifier: IntentClassifier,
    resolver: LocationResolver,
    lookup: ServiceLookup,
    llm: Option<Arc<dyn CompletionModel>>,
    template: PromptTemplate,
}

impl LocalConnectChatbot {
    /// Assemble from already constructed parts
    pub fn new(
        classifier: IntentClassifier,
        resolver: LocationResolver,
        lookup: ServiceLookup,
        llm: Option<Arc<dyn CompletionModel>>,
    ) -> Self {
        Self {
            classifier,
            resolver,
            lookup,
            llm,
            template: PromptTemplate::default(),
        }
    }

    /// Build every provider from configuration; missing credentials leave
    /// the matching provider out instead of failing
    pub fn from_config(config: &LocalConnectConfig) -> Self {
        let catalog = ServiceTypeCatalog::built_in();
        let geocoder = geocoding::from_config(&config.geocoding);
        let lookup = ServiceLookup::from_config(&config.places, Arc::clone(&catalog));
        let llm = llm::from_config(&config.llm);

        info!(
            "Chatbot ready (geocoding: {}, live places: {}, llm: {})",
            geocoder.is_some(),
            lookup.has_live_provider(),
            llm.is_some()
        );

        Self::new(
            IntentClassifier::new(catalog),
            LocationResolver::new(geocoder),
            lookup,
            llm,
        )
    }

    /// Answer a query; every failure comes back as a sentence
    #[instrument(skip(self))]
    pub async fn process_query(&self, text: &str, location: &str) -> String {
        let decision = self.classifier.classify(text);

        match self.answer(text, location, &decision).await {
            Ok(response) => response,
            Err(e) if e.is_quota_exceeded() => {
                warn!("Quota exceeded: {}", e);
                QUOTA_EXCEEDED_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Error processing query: {}", e);
                format!("An error occurred while processing your query: {e}")
            }
        }
    }

    pub async fn handle(&self, query: &Query) -> String {
        let location = query.location_hint.as_deref().unwrap_or(CURRENT_LOCATION);
        self.process_query(&query.text, location).await
    }

    async fn answer(&self, text: &str, location: &str, decision: &RouteDecision) -> Result<String> {
        match (&decision.service_type, decision.is_service_search()) {
            (Some(service_type), true) => {
                Ok(self.search_services(service_type, location, decision).await)
            }
            _ => self.general_answer(text, location, decision).await,
        }
    }

    async fn search_services(
        &self,
        service_type: &str,
        location: &str,
        decision: &RouteDecision,
    ) -> String {
        let place = LocationResolver::effective_location(decision.location.as_deref(), Some(location));
        let resolved = self.resolver.resolve(place).await;

        let records = self
            .lookup
            .search(service_type, resolved.coordinates(), resolved.name())
            .await;

        format_records(service_type, &records)
    }

    async fn general_answer(
        &self,
        text: &str,
        location: &str,
        decision: &RouteDecision,
    ) -> Result<String> {
        let Some(llm) = &self.llm else {
            return Ok(NOT_INITIALIZED_MESSAGE.to_string());
        };

        let place = LocationResolver::effective_location(decision.location.as_deref(), Some(location));
        let resolved = self.resolver.resolve(place).await;
        let prompt = self.template.render(&resolved.description(), text);

        info!("Asking {} a general question", llm.name());
        llm.complete(&prompt).await
    }
}

/// Render service records as the chat reply
#[must_use]
pub fn format_records(service_type: &str, records: &[ServiceRecord]) -> String {
    if records.is_empty() {
        return format!("I couldn't find any {service_type}s in that area.");
    }

    let lines: Vec<String> = records.iter().map(ServiceRecord::to_string).collect();
    format!("Here are some {service_type}s I found:\n{}", lines.join("\n"))
}
