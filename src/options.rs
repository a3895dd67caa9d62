//! Connection options for the AnkiConnect endpoint.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Endpoint AnkiConnect listens on out of the box.
pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://localhost:8765";

/// Protocol version sent with every request. AnkiConnect itself rejects
/// mismatched versions; the bridge never negotiates it.
pub const ANKI_CONNECT_VERSION: u8 = 6;

/// Where and how to reach AnkiConnect.
///
/// - `ANKI_CONNECT_URL`: endpoint (default `http://localhost:8765`)
/// - `ANKI_CONNECT_API_KEY`: optional key, only needed when AnkiConnect has `apiKey` set
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Endpoint receiving the JSON envelopes.
    pub url: String,

    /// Sent as the envelope's `key` field when present.
    pub api_key: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANKI_CONNECT_URL.to_string(),
            api_key: None,
        }
    }
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from `ANKI_CONNECT_URL` and `ANKI_CONNECT_API_KEY`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(url) = std::env::var("ANKI_CONNECT_URL") {
            if !url.trim().is_empty() {
                options = options.with_url(url);
            }
        }
        if let Ok(key) = std::env::var("ANKI_CONNECT_API_KEY") {
            if !key.is_empty() {
                options = options.with_api_key(key);
            }
        }
        options
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}
