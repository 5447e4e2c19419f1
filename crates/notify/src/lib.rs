//! Delivery of notification events to the external email-integration
//! service. The service owns template resolution and the actual send; this
//! side POSTs the event JSON and reports delivery failures without
//! interpreting them.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use leasedesk_core::config::NotificationConfig;
use leasedesk_core::notify::{NotificationEvent, NotificationSink, NotifyError};

/// Sink used when notifications are disabled. Accepts everything and
/// delivers nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn deliver(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        debug!(trigger = %event.trigger_event, "notifications disabled, event dropped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct HttpNotifier {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>, token: Option<SecretString>) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into(), token })
    }

    /// Builds the sink the configuration asks for. Disabled or
    /// endpoint-less configurations get the noop sink.
    pub fn from_config(
        config: &NotificationConfig,
    ) -> Result<Box<dyn NotificationSink>, NotifyError> {
        match (&config.endpoint, config.enabled) {
            (Some(endpoint), true) => {
                Ok(Box::new(Self::new(endpoint.clone(), config.token.clone())?))
            }
            _ => Ok(Box::new(NoopNotifier)),
        }
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn deliver(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        debug!(trigger = %event.trigger_event, entity_id = event.entity_id, "delivering event");

        let mut request = self.http.post(&self.endpoint).json(&event);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response =
            request.send().await.map_err(|e| NotifyError::Delivery(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery(format!(
                "integration service answered {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use leasedesk_core::config::NotificationConfig;
    use leasedesk_core::domain::status::EntityType;
    use leasedesk_core::notify::{NotificationEvent, NotificationSink, NotifyError, Recipient};

    use super::{HttpNotifier, NoopNotifier};

    fn event() -> NotificationEvent {
        NotificationEvent::approved(EntityType::Contract, 42)
            .with_variable("approvedBy", "manager:lena")
            .with_recipient(Recipient::to("owner@example.com", "Owner"))
    }

    #[tokio::test]
    async fn posts_event_json_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/events"))
            .and(header("authorization", "Bearer tok-notify"))
            .and(body_partial_json(json!({
                "triggerEvent": "contract.approved",
                "entityId": 42,
                "recipients": [{"email": "owner@example.com", "type": "to"}]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = HttpNotifier::new(
            format!("{}/events", server.uri()),
            Some("tok-notify".to_string().into()),
        )
        .expect("notifier");
        notifier.deliver(event()).await.expect("deliver");
    }

    #[tokio::test]
    async fn non_success_status_is_a_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier =
            HttpNotifier::new(format!("{}/events", server.uri()), None).expect("notifier");
        let error = notifier.deliver(event()).await.expect_err("delivery");
        assert!(matches!(error, NotifyError::Delivery(_)));
    }

    #[tokio::test]
    async fn noop_sink_accepts_everything() {
        NoopNotifier.deliver(event()).await.expect("noop");
    }

    #[tokio::test]
    async fn disabled_config_builds_the_noop_sink() {
        let config = NotificationConfig {
            enabled: false,
            endpoint: Some("http://localhost:1/events".to_string()),
            token: None,
        };
        let sink = HttpNotifier::from_config(&config).expect("sink");
        // The endpoint is unreachable; only the noop sink succeeds here.
        sink.deliver(event()).await.expect("deliver");
    }
}
