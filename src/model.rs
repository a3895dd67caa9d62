//! Wire shapes exchanged with AnkiConnect.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use crate::client::ClientError;
use crate::options::ANKI_CONNECT_VERSION;

/// Request envelope: `{action, version, params[, key]}`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Invocation<'a> {
    pub action: &'a str,
    pub version: u8,
    pub params: Value,
    pub key: Option<&'a str>,
}

impl<'a> Invocation<'a> {
    pub fn new(action: &'a str, params: Value, key: Option<&'a str>) -> Self {
        Self {
            action,
            version: ANKI_CONNECT_VERSION,
            params,
            key,
        }
    }
}

/// Reply envelope: `{result, error}`.
///
/// Only a JSON object is accepted; missing members read as null.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub result: Value,
    pub error: Option<String>,
}

impl<'de> Deserialize<'de> for Reply {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut members = Map::<String, Value>::deserialize(deserializer)?;
        let error = match members.remove("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(error)) => Some(error),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "`error` must be a string or null, got {other}"
                )))
            }
        };
        Ok(Self {
            result: members.remove("result").unwrap_or(Value::Null),
            error,
        })
    }
}

impl Reply {
    /// A non-empty `error` wins over whatever `result` holds.
    pub fn into_result(self) -> Result<Value, ClientError> {
        match self.error {
            Some(error) if !error.is_empty() => Err(ClientError::Remote(error)),
            _ => Ok(self.result),
        }
    }
}

/// Payload of the `addNote` action.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub deck_name: String,
    pub model_name: String,
    pub fields: BTreeMap<String, String>,
    pub tags: Option<Vec<String>>,
}
