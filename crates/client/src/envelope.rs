//! The generic request/response envelope spoken by the stored-procedure
//! backend.
//!
//! Every resource exposes a single endpoint; a numeric mode selects the
//! server-side operation. Responses carry `success`, an optional message,
//! an optional `data` payload, and any number of named result tables. The
//! backend's positional `table1..tableN` convention stops at this module:
//! callers decode named, typed shapes.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ClientError;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeRequest {
    pub mode: u16,
    pub parameters: Value,
}

impl ModeRequest {
    pub fn new(mode: u16, parameters: Value) -> Self {
        Self { mode, parameters }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl WireEnvelope {
    /// Maps `success: false` to a backend error carrying the
    /// backend-supplied message verbatim.
    pub fn require_success(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            let message =
                self.message.unwrap_or_else(|| "backend reported failure without a message".into());
            Err(ClientError::Backend { message })
        }
    }

    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| ClientError::Decode("envelope has no data payload".into()))?;
        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Decodes a named result table into typed rows. A missing table is an
    /// empty result, not an error; the backend omits empty tables.
    pub fn rows<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, ClientError> {
        let Some(value) = self.extra.get(table) else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value.clone()).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// The id assigned on creation, reported as a `New<Entity>ID` field.
    pub fn new_record_id(&self) -> Option<i64> {
        self.extra
            .iter()
            .find(|(key, _)| key.starts_with("new") || key.starts_with("New"))
            .and_then(|(key, value)| key.ends_with("ID").then(|| value.as_i64()).flatten())
    }
}
