//! Client for the external report service. Rendering happens entirely on
//! the remote side; this module only shapes the request and classifies the
//! returned blob by content type.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use leasedesk_core::config::ApiConfig;
use leasedesk_core::domain::status::EntityType;

use crate::client::ClientError;

/// A rendered report as returned by the report service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportArtifact {
    Pdf(Vec<u8>),
    Html(String),
}

impl ReportArtifact {
    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf(_))
    }

    /// File extension matching the artifact kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf(_) => "pdf",
            Self::Html(_) => "html",
        }
    }
}

#[derive(Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl ReportClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    /// Renders `template` for one record and returns the blob as-is.
    pub async fn render(
        &self,
        entity_type: EntityType,
        id: i64,
        template: &str,
    ) -> Result<ReportArtifact, ClientError> {
        let url = format!("{}/reports/render", self.base_url);
        debug!(%url, entity = %entity_type, id, template, "rendering report");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&json!({
                "entityType": entity_type,
                "entityId": id,
                "template": template,
            }))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::Http { status: status.as_u16() });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        if content_type.starts_with("application/pdf") {
            let bytes = response.bytes().await?;
            Ok(ReportArtifact::Pdf(bytes.to_vec()))
        } else if content_type.starts_with("text/html") {
            let body = response.text().await?;
            Ok(ReportArtifact::Html(body))
        } else {
            Err(ClientError::Decode(format!("unsupported report content type `{content_type}`")))
        }
    }
}
