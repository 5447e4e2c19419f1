use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    leasedesk_cli::run().await
}
