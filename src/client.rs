//! AnkiConnect client trait and error types.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::http::{build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{Invocation, Reply};
use crate::options::ConnectOptions;

/// Everything that can go wrong during one AnkiConnect call.
///
/// Transport and logical failures share this type; callers only format the message.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed AnkiConnect reply: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AnkiConnect returned HTTP status {0}")]
    Status(u16),

    /// Error string reported by AnkiConnect, passed through verbatim.
    #[error("{0}")]
    Remote(String),
}

/// Performs remote AnkiConnect actions.
#[async_trait]
pub trait AnkiConnect: Send + Sync {
    /// Run `action` with `params` and return the reply's `result`.
    async fn invoke(&self, action: &str, params: Value) -> Result<Value, ClientError>;
}

/// HTTP implementation of [`AnkiConnect`].
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http: Client,
    options: ConnectOptions,
}

impl AnkiClient {
    pub fn new(options: ConnectOptions) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client()?,
            options,
        })
    }

    /// Client configured from `ANKI_CONNECT_URL` / `ANKI_CONNECT_API_KEY`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ConnectOptions::from_env())
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }
}

#[async_trait]
impl AnkiConnect for AnkiClient {
    async fn invoke(&self, action: &str, params: Value) -> Result<Value, ClientError> {
        let envelope = Invocation::new(action, params, self.options.api_key.as_deref());
        debug!(action, url = %self.options.url, "invoking AnkiConnect");

        let reply: Reply = self
            .http
            .post(&self.options.url)
            .json_logged(&envelope)
            .send()
            .await?
            .json_logged()
            .await?;

        reply.into_result()
    }
}
