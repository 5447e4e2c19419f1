pub mod approve;
pub mod bulk;
pub mod config;
pub mod doctor;
pub mod pending;
pub mod reject;
pub mod reset;

use std::sync::Arc;

use serde::Serialize;

use leasedesk_client::{ApprovalEndpoint, ApprovalWorkflow, EnvelopeClient};
use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::errors::ApprovalError;
use leasedesk_notify::HttpNotifier;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn error_class(error: &ApprovalError) -> &'static str {
    match error {
        ApprovalError::Validation(_) => "validation",
        ApprovalError::Unauthorized { .. } => "unauthorized",
        ApprovalError::Guard(_) => "guard",
        ApprovalError::Backend(_) => "backend",
        ApprovalError::Network(_) => "network",
    }
}

/// Wires the approval workflow for one resource from the effective config.
pub(crate) fn build_workflow(
    command: &str,
    config: &AppConfig,
    entity: EntityType,
) -> Result<ApprovalWorkflow<ApprovalEndpoint>, CommandResult> {
    let envelope = EnvelopeClient::new(&config.api).map_err(|error| {
        CommandResult::failure(command, "network", error.to_string(), 1)
    })?;
    let sink = HttpNotifier::from_config(&config.notifications).map_err(|error| {
        CommandResult::failure(command, "notify", error.to_string(), 1)
    })?;

    Ok(ApprovalWorkflow::new(
        ApprovalEndpoint::new(envelope, entity),
        Arc::from(sink),
        Vec::new(),
    ))
}
