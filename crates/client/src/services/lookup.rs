use serde::Deserialize;
use serde_json::json;

use leasedesk_core::errors::ApprovalError;

use crate::client::EnvelopeClient;

mod modes {
    pub const LIST: u16 = 5;
}

/// A master-data lookup row (currency, city, tax, department, cost
/// center, ...). All of these resources share one wire shape, so a single
/// generic service covers the family.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LookupRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Clone)]
pub struct LookupService {
    envelope: EnvelopeClient,
    resource: String,
}

impl LookupService {
    pub fn new(envelope: EnvelopeClient, resource: impl Into<String>) -> Self {
        Self { envelope, resource: resource.into() }
    }

    pub async fn list(&self) -> Result<Vec<LookupRow>, ApprovalError> {
        let envelope = self.envelope.execute(&self.resource, modes::LIST, json!({})).await?;
        envelope.rows("rows").map_err(ApprovalError::from)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use leasedesk_core::config::ApiConfig;

    use super::LookupService;
    use crate::client::EnvelopeClient;

    #[tokio::test]
    async fn any_lookup_resource_shares_the_same_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/currencies/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "rows": [
                    {"id": 1, "code": "AED", "name": "UAE Dirham", "active": true},
                    {"id": 2, "code": "USD", "name": "US Dollar", "active": true}
                ]
            })))
            .mount(&server)
            .await;

        let config = ApiConfig {
            base_url: server.uri(),
            token: "tok-test".to_string().into(),
            timeout_secs: 5,
        };
        let service =
            LookupService::new(EnvelopeClient::new(&config).expect("client"), "currencies");

        let rows = service.list().await.expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "AED");
    }
}
