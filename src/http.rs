//! HTTP utilities for talking to AnkiConnect.

use reqwest::{Client, RequestBuilder};

use crate::client::ClientError;

/// Build the HTTP client used for AnkiConnect calls.
///
/// Idle connections are never kept, so every invocation opens its own
/// connection and nothing is shared between calls.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().pool_max_idle_per_host(0).build()
}

/// Extension trait for RequestBuilder that logs request body.
pub trait RequestBuilderExt {
    /// Set JSON request body and log it. Returns the RequestBuilder for chaining.
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string(json) {
            tracing::debug!("AnkiConnect request ({} bytes): {}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Extension trait for Response that logs response body.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Parse response as JSON and log it. Consumes the response.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let status = self.status();
        let bytes = self.bytes().await?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            tracing::debug!("AnkiConnect response {} ({} bytes): {}", status, text.len(), text);
        }

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }
}
