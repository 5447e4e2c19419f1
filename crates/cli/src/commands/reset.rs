use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::gate::AuthContext;

use super::{build_workflow, error_class, CommandResult};

pub async fn run(
    config: &AppConfig,
    ctx: &AuthContext,
    entity: EntityType,
    id: i64,
) -> CommandResult {
    let workflow = match build_workflow("reset", config, entity) {
        Ok(workflow) => workflow,
        Err(result) => return result,
    };

    match workflow.reset(ctx, id).await {
        Ok(()) => CommandResult::success(
            "reset",
            format!("{entity} record {id} returned to pending"),
        ),
        Err(error) => CommandResult::failure("reset", error_class(&error), error.to_string(), 1),
    }
}
