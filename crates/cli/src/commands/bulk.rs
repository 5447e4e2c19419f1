use serde::Serialize;

use leasedesk_client::{ApprovalTransport, BulkFailure};
use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::gate::{AuthContext, BulkAction};

use super::{build_workflow, error_class, CommandResult};

#[derive(Debug, Serialize)]
struct BulkReport {
    command: &'static str,
    entity: String,
    action: String,
    succeeded: usize,
    failed: usize,
    skipped: usize,
    failures: Vec<FailureRow>,
}

#[derive(Debug, Serialize)]
struct FailureRow {
    id: i64,
    reason: String,
}

impl From<BulkFailure> for FailureRow {
    fn from(failure: BulkFailure) -> Self {
        Self { id: failure.id, reason: failure.reason }
    }
}

pub async fn run(
    config: &AppConfig,
    ctx: &AuthContext,
    entity: EntityType,
    action: BulkAction,
    ids: &[i64],
    reason: Option<&str>,
) -> CommandResult {
    if ids.is_empty() {
        return CommandResult::failure("bulk", "validation", "no ids given", 1);
    }

    let workflow = match build_workflow("bulk", config, entity) {
        Ok(workflow) => workflow,
        Err(result) => return result,
    };

    let snapshots = match workflow.transport().snapshot(ids).await {
        Ok(snapshots) => snapshots,
        Err(error) => return CommandResult::failure("bulk", "backend", error.to_string(), 1),
    };

    let outcome = match workflow.bulk(ctx, action, &snapshots, reason).await {
        Ok(outcome) => outcome,
        Err(error) => {
            return CommandResult::failure("bulk", error_class(&error), error.to_string(), 1)
        }
    };

    let exit_code = if outcome.failed == 0 { 0 } else { 1 };
    let report = BulkReport {
        command: "bulk",
        entity: entity.to_string(),
        action: action.to_string(),
        succeeded: outcome.succeeded,
        failed: outcome.failed,
        skipped: outcome.skipped,
        failures: outcome.failures.into_iter().map(FailureRow::from).collect(),
    };

    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("bulk report serialization failed: {error}"));
    CommandResult { exit_code, output }
}
