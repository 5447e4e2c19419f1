//! One service per resource, each method mapping to a fixed numeric mode
//! understood by the server-side stored procedure. Services shape requests
//! and unwrap responses; the only local logic is validation and the
//! mutation guard, both of which run before any network call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use leasedesk_core::domain::status::{ApprovalStatus, EntityType};
use leasedesk_core::errors::DomainError;
use leasedesk_core::gate::StatusSnapshot;

use crate::client::{ClientError, EnvelopeClient};

pub mod contract;
pub mod customer;
pub mod invoice;
pub mod lookup;
pub mod termination;
pub mod voucher;

pub use contract::ContractService;
pub use customer::CustomerService;
pub use invoice::InvoiceService;
pub use lookup::{LookupRow, LookupService};
pub use termination::TerminationService;
pub use voucher::VoucherService;

/// Approval verbs occupy the same mode slots on every resource.
pub(crate) mod approval_modes {
    pub const APPROVE: u16 = 11;
    pub const REJECT: u16 = 12;
    pub const RESET: u16 = 13;
    pub const PENDING: u16 = 14;
    pub const SNAPSHOT: u16 = 15;
}

/// A row from the pending-approval listing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    pub id: i64,
    pub reference: String,
    pub submitted_by: Option<String>,
    pub amount: Option<Decimal>,
    pub submitted_on: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct SnapshotRow {
    id: i64,
    approval_status: String,
}

/// The remote side of the approval workflow, implemented by every
/// approvable resource service.
#[async_trait]
pub trait ApprovalTransport: Send + Sync {
    fn entity_type(&self) -> EntityType;

    async fn approve(&self, id: i64, actor: &str, comments: Option<&str>)
        -> Result<(), ClientError>;
    async fn reject(&self, id: i64, actor: &str, reason: &str) -> Result<(), ClientError>;
    async fn reset(&self, id: i64, actor: &str) -> Result<(), ClientError>;

    async fn pending(&self, limit: u32) -> Result<Vec<PendingApproval>, ClientError>;

    /// Current approval-status snapshots for bulk eligibility filtering.
    async fn snapshot(&self, ids: &[i64]) -> Result<Vec<StatusSnapshot>, ClientError>;
}

/// Shared implementation of the approval verbs over the envelope client.
#[derive(Clone)]
pub struct ApprovalEndpoint {
    envelope: EnvelopeClient,
    entity: EntityType,
}

impl ApprovalEndpoint {
    pub fn new(envelope: EnvelopeClient, entity: EntityType) -> Self {
        Self { envelope, entity }
    }

    fn resource(&self) -> &'static str {
        self.entity.resource()
    }
}

#[async_trait]
impl ApprovalTransport for ApprovalEndpoint {
    fn entity_type(&self) -> EntityType {
        self.entity
    }

    async fn approve(
        &self,
        id: i64,
        actor: &str,
        comments: Option<&str>,
    ) -> Result<(), ClientError> {
        self.envelope
            .execute(
                self.resource(),
                approval_modes::APPROVE,
                json!({"id": id, "approvedBy": actor, "comments": comments}),
            )
            .await
            .map(|_| ())
    }

    async fn reject(&self, id: i64, actor: &str, reason: &str) -> Result<(), ClientError> {
        self.envelope
            .execute(
                self.resource(),
                approval_modes::REJECT,
                json!({"id": id, "rejectedBy": actor, "rejectionReason": reason}),
            )
            .await
            .map(|_| ())
    }

    async fn reset(&self, id: i64, actor: &str) -> Result<(), ClientError> {
        self.envelope
            .execute(
                self.resource(),
                approval_modes::RESET,
                json!({"id": id, "resetBy": actor}),
            )
            .await
            .map(|_| ())
    }

    async fn pending(&self, limit: u32) -> Result<Vec<PendingApproval>, ClientError> {
        let envelope = self
            .envelope
            .execute(self.resource(), approval_modes::PENDING, json!({"limit": limit}))
            .await?;
        envelope.rows("pendingApprovals")
    }

    async fn snapshot(&self, ids: &[i64]) -> Result<Vec<StatusSnapshot>, ClientError> {
        let envelope = self
            .envelope
            .execute(self.resource(), approval_modes::SNAPSHOT, json!({"ids": ids}))
            .await?;

        let rows: Vec<SnapshotRow> = envelope.rows("statuses")?;
        rows.into_iter()
            .map(|row| {
                let status = ApprovalStatus::parse(&row.approval_status)
                    .map_err(|e: DomainError| ClientError::Decode(e.to_string()))?;
                Ok(StatusSnapshot { id: row.id, status })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use leasedesk_core::config::ApiConfig;
    use leasedesk_core::domain::status::{ApprovalStatus, EntityType};

    use super::{ApprovalEndpoint, ApprovalTransport};
    use crate::client::EnvelopeClient;

    async fn endpoint(server: &MockServer) -> ApprovalEndpoint {
        let config = ApiConfig {
            base_url: server.uri(),
            token: "tok-test".to_string().into(),
            timeout_secs: 5,
        };
        ApprovalEndpoint::new(
            EnvelopeClient::new(&config).expect("client"),
            EntityType::Contract,
        )
    }

    #[tokio::test]
    async fn approve_sends_mode_and_actor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contracts/execute"))
            .and(body_partial_json(json!({
                "mode": 11,
                "parameters": {"id": 42, "approvedBy": "manager:lena", "comments": "ok"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        endpoint(&server).await.approve(42, "manager:lena", Some("ok")).await.expect("approve");
    }

    #[tokio::test]
    async fn pending_decodes_named_table() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contracts/execute"))
            .and(body_partial_json(json!({"mode": 14})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "pendingApprovals": [
                    {"id": 1, "reference": "CT-0001", "submittedBy": "staff:imran"},
                    {"id": 2, "reference": "CT-0002"}
                ]
            })))
            .mount(&server)
            .await;

        let rows = endpoint(&server).await.pending(50).await.expect("pending");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reference, "CT-0001");
        assert_eq!(rows[1].submitted_by, None);
    }

    #[tokio::test]
    async fn snapshot_parses_wire_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contracts/execute"))
            .and(body_partial_json(json!({"mode": 15, "parameters": {"ids": [1, 2]}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "statuses": [
                    {"id": 1, "approvalStatus": "Pending"},
                    {"id": 2, "approvalStatus": "Approved"}
                ]
            })))
            .mount(&server)
            .await;

        let snapshots = endpoint(&server).await.snapshot(&[1, 2]).await.expect("snapshot");
        assert_eq!(snapshots[0].status, ApprovalStatus::Pending);
        assert_eq!(snapshots[1].status, ApprovalStatus::Approved);
    }
}
