use serde::Serialize;

use leasedesk_client::{ApprovalEndpoint, ApprovalTransport, ClientError, EnvelopeClient};
use leasedesk_core::config::{AppConfig, ConfigError};
use leasedesk_core::domain::status::EntityType;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub async fn run(loaded: &Result<AppConfig, ConfigError>, json_output: bool) -> CommandResult {
    let report = build_report(loaded).await;
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

async fn build_report(loaded: &Result<AppConfig, ConfigError>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_notifications(config));
            checks.push(check_api_reachability(config).await);
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "notification_endpoint",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "api_reachability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_ok = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_ok { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_ok {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_notifications(config: &AppConfig) -> DoctorCheck {
    let details = match (config.notifications.enabled, &config.notifications.endpoint) {
        (true, Some(endpoint)) => format!("enabled, delivering to `{endpoint}`"),
        (false, _) => "disabled, events will be dropped".to_string(),
        // Unreachable after validation; validation requires an endpoint
        // when enabled.
        (true, None) => "enabled without an endpoint".to_string(),
    };
    DoctorCheck { name: "notification_endpoint", status: CheckStatus::Pass, details }
}

/// Issues the cheapest real call the API accepts. A backend-level refusal
/// still proves the service answered.
async fn check_api_reachability(config: &AppConfig) -> DoctorCheck {
    let name = "api_reachability";
    let envelope = match EnvelopeClient::new(&config.api) {
        Ok(envelope) => envelope,
        Err(error) => {
            return DoctorCheck { name, status: CheckStatus::Fail, details: error.to_string() }
        }
    };

    let endpoint = ApprovalEndpoint::new(envelope, EntityType::Contract);
    match endpoint.pending(1).await {
        Ok(_) | Err(ClientError::Backend { .. }) => DoctorCheck {
            name,
            status: CheckStatus::Pass,
            details: format!("reachable at `{}`", config.api.base_url),
        },
        Err(error) => DoctorCheck { name, status: CheckStatus::Fail, details: error.to_string() },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
