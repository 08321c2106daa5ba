//! Incoming queries and routing decisions

use serde::{Deserialize, Serialize};

/// Location sentinel meaning "use the caller-supplied location, do not geocode"
pub const CURRENT_LOCATION: &str = "current_location";

/// A single user query as it arrives from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub location_hint: Option<String>,
}

impl Query {
    #[must_use]
    pub fn new(text: impl Into<String>, location_hint: Option<String>) -> Self {
        Self {
            text: text.into(),
            location_hint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GeneralQuery,
    SearchService,
}

/// Outcome of classifying a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub intent: Intent,
    /// Canonical catalog label, set only for `SearchService`
    pub service_type: Option<String>,
    pub location: Option<String>,
}

impl RouteDecision {
    #[must_use]
    pub fn is_service_search(&self) -> bool {
        self.intent == Intent::SearchService
    }
}

/// Whether a location string names a real place rather than the sentinel
#[must_use]
pub fn is_explicit_location(location: &str) -> bool {
    !location.trim().is_empty() && location != CURRENT_LOCATION
}
