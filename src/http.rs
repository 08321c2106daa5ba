//! Shared HTTP plumbing for the provider clients

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{LocalConnectError, Result};

const USER_AGENT: &str = concat!("LocalConnect/", env!("CARGO_PKG_VERSION"));

/// Build a client with the provider's timeout
pub fn build_client(timeout_seconds: u32) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Turn a non-success response into a provider error carrying the body text
async fn ensure_success(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LocalConnectError::provider_call(
        provider,
        format!("HTTP {status}: {body}"),
    ))
}

/// Check the status and decode a JSON body
pub async fn read_json<T: DeserializeOwned>(provider: &str, response: Response) -> Result<T> {
    let response = ensure_success(provider, response).await?;
    response.json().await.map_err(|e| {
        LocalConnectError::invalid_response(
            provider,
            format!("Failed to parse response: {}", e.without_url()),
        )
    })
}

/// Hide a credential before a URL reaches the logs
#[must_use]
pub fn redact(url: &str, secret: &str) -> String {
    if secret.is_empty() {
        return url.to_string();
    }
    url.replace(secret, "***")
        .replace(&urlencoding::encode(secret).into_owned(), "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_key() {
        let url = "https://example.com/json?address=Durban&key=abc123";
        assert_eq!(
            redact(url, "abc123"),
            "https://example.com/json?address=Durban&key=***"
        );
    }

    #[test]
    fn test_redact_with_empty_secret() {
        assert_eq!(redact("https://example.com", ""), "https://example.com");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(5).is_ok());
    }
}
