//! Data models for the `LocalConnect` assistant
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and geocoding results
//! - Service: Venue records returned by the places lookup
//! - Route: Incoming queries and the routing decision derived from them

pub mod location;
pub mod route;
pub mod service;

// Re-export all public types for convenient access
pub use location::{Coordinates, GeocodeResult};
pub use route::{CURRENT_LOCATION, Intent, Query, RouteDecision, is_explicit_location};
pub use service::ServiceRecord;
