use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::gate::AuthContext;

use super::{build_workflow, error_class, CommandResult};

pub async fn run(
    config: &AppConfig,
    ctx: &AuthContext,
    entity: EntityType,
    id: i64,
    reason: &str,
) -> CommandResult {
    let workflow = match build_workflow("reject", config, entity) {
        Ok(workflow) => workflow,
        Err(result) => return result,
    };

    match workflow.reject(ctx, id, reason).await {
        Ok(()) => CommandResult::success("reject", format!("{entity} record {id} rejected")),
        Err(error) => CommandResult::failure("reject", error_class(&error), error.to_string(), 1),
    }
}
