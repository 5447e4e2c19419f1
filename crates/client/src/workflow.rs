//! Approval workflow orchestration over a resource transport.
//!
//! Single transitions authorize and validate locally, call the backend,
//! and emit the notification event only after the backend confirms. Bulk
//! transitions filter to Pending snapshots, fan the eligible subset out as
//! independent unordered calls, and tally the aggregate; one member's
//! failure never aborts its siblings, and nothing spans the batch as a
//! transaction.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use leasedesk_core::errors::ApprovalError;
use leasedesk_core::gate::{
    authorize_transition, partition_eligible, validate_rejection_reason, AuthContext, BulkAction,
    StatusSnapshot,
};
use leasedesk_core::notify::{NotificationEvent, NotificationSink, Recipient};

use crate::services::ApprovalTransport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: i64,
    pub reason: String,
}

/// Aggregate result of a bulk transition. Skipped ids were not Pending
/// and are neither successes nor failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<BulkFailure>,
}

pub struct ApprovalWorkflow<T> {
    transport: T,
    sink: Arc<dyn NotificationSink>,
    recipients: Vec<Recipient>,
}

impl<T: ApprovalTransport> ApprovalWorkflow<T> {
    pub fn new(transport: T, sink: Arc<dyn NotificationSink>, recipients: Vec<Recipient>) -> Self {
        Self { transport, sink, recipients }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn approve(
        &self,
        ctx: &AuthContext,
        id: i64,
        comments: Option<&str>,
    ) -> Result<(), ApprovalError> {
        authorize_transition(ctx)?;
        self.transport.approve(id, &ctx.actor, comments).await.map_err(ApprovalError::from)?;

        info!(entity = %self.transport.entity_type(), id, actor = %ctx.actor, "record approved");
        let mut event = NotificationEvent::approved(self.transport.entity_type(), id)
            .with_variable("approvedBy", ctx.actor.clone());
        if let Some(comments) = comments {
            event = event.with_variable("comments", comments.to_owned());
        }
        self.emit(event).await;
        Ok(())
    }

    pub async fn reject(
        &self,
        ctx: &AuthContext,
        id: i64,
        reason: &str,
    ) -> Result<(), ApprovalError> {
        authorize_transition(ctx)?;
        validate_rejection_reason(reason)?;
        self.transport.reject(id, &ctx.actor, reason).await.map_err(ApprovalError::from)?;

        info!(entity = %self.transport.entity_type(), id, actor = %ctx.actor, "record rejected");
        let event = NotificationEvent::rejected(self.transport.entity_type(), id)
            .with_variable("rejectedBy", ctx.actor.clone())
            .with_variable("rejectionReason", reason.to_owned());
        self.emit(event).await;
        Ok(())
    }

    /// Returns the record to Pending and clears provenance. No
    /// notification fires for reset.
    pub async fn reset(&self, ctx: &AuthContext, id: i64) -> Result<(), ApprovalError> {
        authorize_transition(ctx)?;
        self.transport.reset(id, &ctx.actor).await.map_err(ApprovalError::from)?;
        info!(entity = %self.transport.entity_type(), id, actor = %ctx.actor, "approval reset");
        Ok(())
    }

    pub async fn bulk(
        &self,
        ctx: &AuthContext,
        action: BulkAction,
        snapshots: &[StatusSnapshot],
        reason: Option<&str>,
    ) -> Result<BulkOutcome, ApprovalError> {
        authorize_transition(ctx)?;
        let reason = match action {
            BulkAction::Approve => None,
            BulkAction::Reject => {
                let reason = reason.unwrap_or_default();
                validate_rejection_reason(reason)?;
                Some(reason)
            }
        };

        let plan = partition_eligible(snapshots);
        let calls = plan.eligible.iter().map(|&id| async move {
            let result = match (action, reason) {
                (BulkAction::Approve, _) => self.transport.approve(id, &ctx.actor, None).await,
                (BulkAction::Reject, Some(reason)) => {
                    self.transport.reject(id, &ctx.actor, reason).await
                }
                (BulkAction::Reject, None) => unreachable!("reject reason validated above"),
            };
            (id, result)
        });

        let mut outcome =
            BulkOutcome { skipped: plan.skipped.len(), ..BulkOutcome::default() };
        for (id, result) in join_all(calls).await {
            match result {
                Ok(()) => {
                    outcome.succeeded += 1;
                    let event = match action {
                        BulkAction::Approve => {
                            NotificationEvent::approved(self.transport.entity_type(), id)
                        }
                        BulkAction::Reject => {
                            NotificationEvent::rejected(self.transport.entity_type(), id)
                        }
                    };
                    self.emit(event.with_variable("actor", ctx.actor.clone())).await;
                }
                Err(error) => {
                    outcome.failed += 1;
                    outcome.failures.push(BulkFailure { id, reason: error.to_string() });
                }
            }
        }

        info!(
            entity = %self.transport.entity_type(),
            ?action,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "bulk transition settled"
        );
        Ok(outcome)
    }

    async fn emit(&self, mut event: NotificationEvent) {
        for recipient in &self.recipients {
            event = event.with_recipient(recipient.clone());
        }
        if let Err(error) = self.sink.deliver(event).await {
            // The transition already succeeded; delivery problems are the
            // integration's to surface, not ours to fail on.
            warn!(%error, "notification delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use leasedesk_core::domain::approval::ApprovalState;
    use leasedesk_core::domain::status::{ApprovalStatus, EntityType};
    use leasedesk_core::errors::ApprovalError;
    use leasedesk_core::gate::{AuthContext, BulkAction, Role, StatusSnapshot};
    use leasedesk_core::notify::{InMemoryNotificationSink, Recipient};

    use super::{ApprovalWorkflow, BulkFailure};
    use crate::client::ClientError;
    use crate::services::{ApprovalTransport, PendingApproval};

    /// In-memory transport applying the pure transitions, with selectable
    /// backend failures.
    #[derive(Default)]
    struct FakeTransport {
        records: Mutex<HashMap<i64, ApprovalState>>,
        fail_ids: HashSet<i64>,
    }

    impl FakeTransport {
        fn with_records(ids: &[(i64, ApprovalStatus)]) -> Self {
            let records = ids
                .iter()
                .map(|&(id, status)| {
                    let mut state = ApprovalState::new(true);
                    state.status = status;
                    (id, state)
                })
                .collect();
            Self { records: Mutex::new(records), fail_ids: HashSet::new() }
        }

        fn failing(mut self, id: i64) -> Self {
            self.fail_ids.insert(id);
            self
        }

        fn status(&self, id: i64) -> ApprovalStatus {
            self.records.lock().expect("lock")[&id].status
        }

        fn state(&self, id: i64) -> ApprovalState {
            self.records.lock().expect("lock")[&id].clone()
        }

        fn check_fail(&self, id: i64) -> Result<(), ClientError> {
            if self.fail_ids.contains(&id) {
                Err(ClientError::Backend { message: format!("record {id} is locked") })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ApprovalTransport for FakeTransport {
        fn entity_type(&self) -> EntityType {
            EntityType::Contract
        }

        async fn approve(
            &self,
            id: i64,
            actor: &str,
            comments: Option<&str>,
        ) -> Result<(), ClientError> {
            self.check_fail(id)?;
            let mut records = self.records.lock().expect("lock");
            records.get_mut(&id).expect("record").apply_approve(actor, comments);
            Ok(())
        }

        async fn reject(&self, id: i64, actor: &str, reason: &str) -> Result<(), ClientError> {
            self.check_fail(id)?;
            let mut records = self.records.lock().expect("lock");
            records
                .get_mut(&id)
                .expect("record")
                .apply_reject(actor, reason)
                .map_err(|e| ClientError::Backend { message: e.to_string() })
        }

        async fn reset(&self, id: i64, _actor: &str) -> Result<(), ClientError> {
            self.check_fail(id)?;
            let mut records = self.records.lock().expect("lock");
            records.get_mut(&id).expect("record").apply_reset();
            Ok(())
        }

        async fn pending(&self, limit: u32) -> Result<Vec<PendingApproval>, ClientError> {
            let records = self.records.lock().expect("lock");
            Ok(records
                .iter()
                .filter(|(_, state)| state.status == ApprovalStatus::Pending)
                .take(limit as usize)
                .map(|(&id, _)| PendingApproval {
                    id,
                    reference: format!("CT-{id:04}"),
                    submitted_by: None,
                    amount: None,
                    submitted_on: None,
                })
                .collect())
        }

        async fn snapshot(&self, ids: &[i64]) -> Result<Vec<StatusSnapshot>, ClientError> {
            let records = self.records.lock().expect("lock");
            Ok(ids
                .iter()
                .filter_map(|id| {
                    records.get(id).map(|state| StatusSnapshot { id: *id, status: state.status })
                })
                .collect())
        }
    }

    fn workflow(
        transport: FakeTransport,
    ) -> (ApprovalWorkflow<FakeTransport>, InMemoryNotificationSink) {
        let sink = InMemoryNotificationSink::default();
        let workflow = ApprovalWorkflow::new(
            transport,
            Arc::new(sink.clone()),
            vec![Recipient::to("owner@example.com", "Owner")],
        );
        (workflow, sink)
    }

    fn manager() -> AuthContext {
        AuthContext::new("manager:lena", Role::Manager)
    }

    #[tokio::test]
    async fn manager_approval_transitions_and_notifies_once() {
        let transport = FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        workflow.approve(&manager(), 42, Some("looks good")).await.expect("approve");

        let state = workflow.transport().state(42);
        assert_eq!(state.status, ApprovalStatus::Approved);
        assert_eq!(state.comments.as_deref(), Some("looks good"));
        assert_eq!(state.approved_by.as_deref(), Some("manager:lena"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_event, "contract.approved");
        assert_eq!(events[0].entity_id, 42);
        assert_eq!(events[0].recipients.len(), 1);
    }

    #[tokio::test]
    async fn staff_role_is_unauthorized_and_emits_nothing() {
        let transport = FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        let ctx = AuthContext::new("staff:imran", Role::Staff);
        let error = workflow.approve(&ctx, 42, None).await.expect_err("unauthorized");
        assert!(matches!(error, ApprovalError::Unauthorized { role: Role::Staff }));

        assert_eq!(workflow.transport().status(42), ApprovalStatus::Pending);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn blank_rejection_reason_fails_before_any_call() {
        let transport = FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        for reason in ["", "   "] {
            let error = workflow.reject(&manager(), 42, reason).await.expect_err("validation");
            assert!(matches!(error, ApprovalError::Validation(_)));
        }
        assert_eq!(workflow.transport().status(42), ApprovalStatus::Pending);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn reject_records_reason_and_notifies() {
        let transport = FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        workflow.reject(&manager(), 42, "rent below floor").await.expect("reject");

        let state = workflow.transport().state(42);
        assert_eq!(state.status, ApprovalStatus::Rejected);
        assert_eq!(state.rejection_reason.as_deref(), Some("rent below floor"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_event, "contract.rejected");
    }

    #[tokio::test]
    async fn reset_returns_to_pending_and_emits_nothing() {
        let transport = FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        workflow.approve(&manager(), 42, Some("ok")).await.expect("approve");
        workflow.reset(&manager(), 42).await.expect("reset");

        let state = workflow.transport().state(42);
        assert_eq!(state.status, ApprovalStatus::Pending);
        assert!(state.comments.is_none());
        assert!(state.approved_by.is_none());

        // Only the approval notified; reset stayed silent.
        assert_eq!(sink.events().len(), 1);

        workflow.reset(&manager(), 42).await.expect("reset twice");
        assert_eq!(workflow.transport().state(42), state);
    }

    #[tokio::test]
    async fn backend_failure_surfaces_message_and_emits_nothing() {
        let transport =
            FakeTransport::with_records(&[(42, ApprovalStatus::Pending)]).failing(42);
        let (workflow, sink) = workflow(transport);

        let error = workflow.approve(&manager(), 42, None).await.expect_err("backend");
        assert_eq!(error, ApprovalError::Backend("record 42 is locked".to_string()));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn bulk_processes_only_pending_ids() {
        let transport = FakeTransport::with_records(&[
            (1, ApprovalStatus::Pending),
            (2, ApprovalStatus::Approved),
            (3, ApprovalStatus::Pending),
            (4, ApprovalStatus::Rejected),
        ]);
        let (workflow, sink) = workflow(transport);

        let snapshots =
            workflow.transport().snapshot(&[1, 2, 3, 4]).await.expect("snapshot");
        let outcome = workflow
            .bulk(&manager(), BulkAction::Approve, &snapshots, None)
            .await
            .expect("bulk");

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.skipped, 2);
        assert!(outcome.failures.is_empty());

        assert_eq!(workflow.transport().status(1), ApprovalStatus::Approved);
        assert_eq!(workflow.transport().status(3), ApprovalStatus::Approved);
        // Skipped ids are untouched.
        assert_eq!(workflow.transport().status(4), ApprovalStatus::Rejected);
        assert_eq!(sink.events().len(), 2);
    }

    #[tokio::test]
    async fn bulk_member_failure_does_not_abort_siblings() {
        let transport = FakeTransport::with_records(&[
            (1, ApprovalStatus::Pending),
            (2, ApprovalStatus::Pending),
            (3, ApprovalStatus::Pending),
        ])
        .failing(2);
        let (workflow, sink) = workflow(transport);

        let snapshots = workflow.transport().snapshot(&[1, 2, 3]).await.expect("snapshot");
        let outcome = workflow
            .bulk(&manager(), BulkAction::Approve, &snapshots, None)
            .await
            .expect("bulk");

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(
            outcome.failures,
            vec![BulkFailure { id: 2, reason: "record 2 is locked".to_string() }]
        );

        assert_eq!(workflow.transport().status(1), ApprovalStatus::Approved);
        assert_eq!(workflow.transport().status(2), ApprovalStatus::Pending);
        assert_eq!(workflow.transport().status(3), ApprovalStatus::Approved);
        assert_eq!(sink.events().len(), 2);
    }

    #[tokio::test]
    async fn bulk_reject_requires_a_reason() {
        let transport = FakeTransport::with_records(&[(1, ApprovalStatus::Pending)]);
        let (workflow, _sink) = workflow(transport);

        let snapshots = workflow.transport().snapshot(&[1]).await.expect("snapshot");
        let error = workflow
            .bulk(&manager(), BulkAction::Reject, &snapshots, None)
            .await
            .expect_err("missing reason");
        assert!(matches!(error, ApprovalError::Validation(_)));
        assert_eq!(workflow.transport().status(1), ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn bulk_reject_applies_reason_to_each_member() {
        let transport = FakeTransport::with_records(&[
            (1, ApprovalStatus::Pending),
            (2, ApprovalStatus::Pending),
        ]);
        let (workflow, sink) = workflow(transport);

        let snapshots = workflow.transport().snapshot(&[1, 2]).await.expect("snapshot");
        let outcome = workflow
            .bulk(&manager(), BulkAction::Reject, &snapshots, Some("budget freeze"))
            .await
            .expect("bulk");

        assert_eq!(outcome.succeeded, 2);
        for id in [1, 2] {
            let state = workflow.transport().state(id);
            assert_eq!(state.status, ApprovalStatus::Rejected);
            assert_eq!(state.rejection_reason.as_deref(), Some("budget freeze"));
        }
        assert_eq!(sink.events().len(), 2);
    }

    #[tokio::test]
    async fn bulk_as_viewer_is_unauthorized() {
        let transport = FakeTransport::with_records(&[(1, ApprovalStatus::Pending)]);
        let (workflow, sink) = workflow(transport);

        let ctx = AuthContext::new("viewer:omar", Role::Viewer);
        let error = workflow
            .bulk(&ctx, BulkAction::Approve, &[], None)
            .await
            .expect_err("unauthorized");
        assert!(matches!(error, ApprovalError::Unauthorized { .. }));
        assert!(sink.events().is_empty());
    }
}
