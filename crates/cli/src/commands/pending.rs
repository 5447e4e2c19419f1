use leasedesk_client::export::format_csv;
use leasedesk_client::{ApprovalEndpoint, ApprovalTransport, EnvelopeClient, PendingApproval};
use leasedesk_core::config::AppConfig;
use leasedesk_core::domain::status::EntityType;

use super::CommandResult;

pub async fn run(
    config: &AppConfig,
    entity: EntityType,
    limit: u32,
    csv: bool,
) -> CommandResult {
    let envelope = match EnvelopeClient::new(&config.api) {
        Ok(envelope) => envelope,
        Err(error) => return CommandResult::failure("pending", "network", error.to_string(), 1),
    };

    let endpoint = ApprovalEndpoint::new(envelope, entity);
    let rows = match endpoint.pending(limit).await {
        Ok(rows) => rows,
        Err(error) => {
            return CommandResult::failure("pending", "backend", error.to_string(), 1)
        }
    };

    if csv {
        return CommandResult { exit_code: 0, output: render_csv(&rows) };
    }

    if rows.is_empty() {
        return CommandResult {
            exit_code: 0,
            output: format!("no {entity} records awaiting approval"),
        };
    }

    let mut lines = vec![format!("{} pending {entity} record(s):", rows.len())];
    for row in rows {
        let submitted_by = row.submitted_by.as_deref().unwrap_or("-");
        let amount =
            row.amount.map(|amount| amount.to_string()).unwrap_or_else(|| "-".to_string());
        let submitted_on = row
            .submitted_on
            .map(|when| when.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "- #{} {} submitted_by={submitted_by} amount={amount} on={submitted_on}",
            row.id, row.reference
        ));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn render_csv(rows: &[PendingApproval]) -> String {
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.reference.clone(),
                row.submitted_by.clone().unwrap_or_default(),
                row.amount.map(|amount| amount.to_string()).unwrap_or_default(),
                row.submitted_on.map(|when| when.to_rfc3339()).unwrap_or_default(),
            ]
        })
        .collect();
    format_csv(&["id", "reference", "submittedBy", "amount", "submittedOn"], &data)
}
