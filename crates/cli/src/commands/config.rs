use leasedesk_core::config::AppConfig;

use super::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let mut lines =
        vec!["effective config (source precedence: flags > env > file > default):".to_string()];
    for (key, value) in config.redacted_summary() {
        lines.push(format!("- {key} = {value}"));
    }
    CommandResult { exit_code: 0, output: lines.join("\n") }
}
