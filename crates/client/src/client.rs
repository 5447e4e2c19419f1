use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use leasedesk_core::config::ApiConfig;
use leasedesk_core::errors::ApprovalError;

use crate::envelope::{ModeRequest, WireEnvelope};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected http status {status}")]
    Http { status: u16 },
    #[error("{message}")]
    Backend { message: String },
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            Self::Http { status: status.as_u16() }
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<ClientError> for ApprovalError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Backend { message } => Self::Backend(message),
            ClientError::Decode(message) => Self::Backend(message),
            ClientError::Transport(message) => Self::Network(message),
            ClientError::Http { status } => {
                Self::Network(format!("unexpected http status {status}"))
            }
        }
    }
}

/// HTTP client for the mode-number envelope API.
///
/// One endpoint per resource, bearer auth, a single attempt per call. A
/// failed transition is re-issued explicitly by the user, never retried
/// here.
#[derive(Clone)]
pub struct EnvelopeClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl EnvelopeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    pub async fn execute(
        &self,
        resource: &str,
        mode: u16,
        parameters: Value,
    ) -> Result<WireEnvelope, ClientError> {
        let url = format!("{}/{resource}/execute", self.base_url);
        debug!(%url, mode, "executing envelope request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&ModeRequest::new(mode, parameters))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Http { status: status.as_u16() });
        }

        let envelope: WireEnvelope =
            response.json().await.map_err(|e| ClientError::Decode(e.to_string()))?;
        envelope.require_success()
    }
}
