//! Error types and handling for the `LocalConnect` assistant

use thiserror::Error;

/// Main error type for the `LocalConnect` assistant
#[derive(Error, Debug)]
pub enum LocalConnectError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A provider has no credential or could not be constructed
    #[error("{provider} is not available: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// A provider call failed on the wire or returned an error status
    #[error("{provider} request failed: {message}")]
    ProviderCall { provider: String, message: String },

    /// A provider answered with a body we could not use
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse { provider: String, message: String },

    /// HTTP client errors, with the request URL stripped
    #[error("HTTP error: {source}")]
    Http { source: reqwest::Error },
}

impl From<reqwest::Error> for LocalConnectError {
    fn from(source: reqwest::Error) -> Self {
        // Provider URLs carry the API key in the query string
        Self::Http {
            source: source.without_url(),
        }
    }
}

impl LocalConnectError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider-unavailable error
    pub fn unavailable<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new provider call error
    pub fn provider_call<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::ProviderCall {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the provider reported rate or billing exhaustion
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.to_string().to_lowercase().contains("quota")
    }
}
