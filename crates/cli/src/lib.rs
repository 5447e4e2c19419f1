pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use leasedesk_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::gate::{AuthContext, BulkAction, Role};

#[derive(Debug, Parser)]
#[command(
    name = "leasedesk",
    about = "Lease back-office operator CLI",
    long_about = "Inspect configuration, probe API readiness, and drive single or bulk approval transitions.",
    after_help = "Examples:\n  leasedesk doctor --json\n  leasedesk pending --entity contracts\n  leasedesk approve --entity contracts --id 42 --comments \"terms verified\"\n  leasedesk bulk --entity petty-cash-vouchers --action reject --ids 4,8,15 --reason \"budget freeze\""
)]
pub struct Cli {
    #[arg(long, global = true, help = "Act as this user instead of the configured operator")]
    pub actor: Option<String>,
    #[arg(long, global = true, help = "Act under this role instead of the configured one")]
    pub role: Option<Role>,
    #[arg(long, global = true, value_name = "PATH", help = "Explicit config file path")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Inspect effective configuration values with secret redaction")]
    Config,
    #[command(about = "Validate config and probe API reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List records awaiting approval")]
    Pending {
        #[arg(long)]
        entity: EntityType,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long, help = "Emit CSV for back-office export")]
        csv: bool,
    },
    #[command(about = "Approve one record")]
    Approve {
        #[arg(long)]
        entity: EntityType,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        comments: Option<String>,
    },
    #[command(about = "Reject one record; a reason is mandatory")]
    Reject {
        #[arg(long)]
        entity: EntityType,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        reason: String,
    },
    #[command(about = "Return an approved or rejected record to pending")]
    Reset {
        #[arg(long)]
        entity: EntityType,
        #[arg(long)]
        id: i64,
    },
    #[command(about = "Approve or reject many records; non-pending ids are skipped")]
    Bulk {
        #[arg(long)]
        entity: EntityType,
        #[arg(long)]
        action: BulkAction,
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
        #[arg(long)]
        reason: Option<String>,
    },
}

pub async fn run() -> ExitCode {
    execute(Cli::parse()).await
}

pub async fn execute(cli: Cli) -> ExitCode {
    let options = LoadOptions {
        config_path: cli.config,
        require_file: false,
        overrides: ConfigOverrides {
            operator_actor: cli.actor,
            operator_role: cli.role,
            ..ConfigOverrides::default()
        },
    };
    let loaded = AppConfig::load(options);
    if let Ok(config) = &loaded {
        init_logging(config);
    }

    // Doctor reports a config failure as a failing check instead of
    // refusing to run.
    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(&loaded, json).await,
        command => match loaded {
            Ok(config) => dispatch(command, config).await,
            Err(error) => commands::CommandResult::failure(
                "config",
                "config_validation",
                error.to_string(),
                2,
            ),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

async fn dispatch(command: Command, config: AppConfig) -> commands::CommandResult {
    let ctx = AuthContext::new(config.operator.actor.clone(), config.operator.role);

    match command {
        Command::Config => commands::config::run(&config),
        Command::Doctor { .. } => unreachable!("doctor is handled before dispatch"),
        Command::Pending { entity, limit, csv } => {
            commands::pending::run(&config, entity, limit, csv).await
        }
        Command::Approve { entity, id, comments } => {
            commands::approve::run(&config, &ctx, entity, id, comments.as_deref()).await
        }
        Command::Reject { entity, id, reason } => {
            commands::reject::run(&config, &ctx, entity, id, &reason).await
        }
        Command::Reset { entity, id } => commands::reset::run(&config, &ctx, entity, id).await,
        Command::Bulk { entity, action, ids, reason } => {
            commands::bulk::run(&config, &ctx, entity, action, &ids, reason.as_deref()).await
        }
    }
}

fn init_logging(config: &AppConfig) {
    use leasedesk_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init keeps repeated in-process invocations (tests) harmless.
    let result = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
    let _ = result;
}
