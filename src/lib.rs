//! `LocalConnect` - a local services assistant
//!
//! This library classifies user queries, resolves the place they refer to,
//! and answers from a places search with a built-in directory fallback or
//! from a language model for general questions.

pub mod api;
pub mod catalog;
pub mod chatbot;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod llm;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod places;
pub mod web;

// Re-export core types for public API
pub use catalog::{ServiceType, ServiceTypeCatalog};
pub use chatbot::LocalConnectChatbot;
pub use classifier::IntentClassifier;
pub use config::LocalConnectConfig;
pub use error::LocalConnectError;
pub use geocoding::Geocoder;
pub use llm::{CompletionModel, PromptTemplate};
pub use location_resolver::{LocationResolver, ResolvedLocation};
pub use models::{Coordinates, GeocodeResult, Intent, Query, RouteDecision, ServiceRecord};
pub use places::{PlacesProvider, ServiceLookup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LocalConnectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
