use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::gate::AuthContext;

use super::{build_workflow, error_class, CommandResult};

pub async fn run(
    config: &AppConfig,
    ctx: &AuthContext,
    entity: EntityType,
    id: i64,
    comments: Option<&str>,
) -> CommandResult {
    let workflow = match build_workflow("approve", config, entity) {
        Ok(workflow) => workflow,
        Err(result) => return result,
    };

    match workflow.approve(ctx, id, comments).await {
        Ok(()) => CommandResult::success("approve", format!("{entity} record {id} approved")),
        Err(error) => {
            CommandResult::failure("approve", error_class(&error), error.to_string(), 1)
        }
    }
}
