//! Deployment hook dry run.
//!
//! Drives the token DAO hook set through a full host lifecycle against the
//! in-memory runtime and prints the resulting call log.

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use dephook_core::config::AppConfig;
use dephook_core::config::logging::LoggingConfig;
use dephook_core::error::AppError;
use dephook_runtime::capabilities::Clock;
use dephook_runtime::hooks::definitions::{HookParams, HookPoint};
use dephook_runtime::hooks::dispatcher::HookDispatcher;
use dephook_runtime::hooks::registry::HookRegistry;
use dephook_runtime::mock::{MockChain, RecordedCall};
use scenario_token_dao::TokenDaoHooks;

/// Run the token DAO deployment hooks against a simulated host
#[derive(Debug, Parser)]
#[command(name = "dephook-dry-run", version, about, long_about = None)]
struct Cli {
    /// Extra configuration file layered over config/default and config/{env}
    #[arg(short, long)]
    config: Option<String>,

    /// Configuration environment name
    #[arg(short, long, default_value = "development")]
    env: String,

    /// Number of simulated host accounts
    #[arg(long, default_value_t = 2)]
    accounts: usize,

    /// Number of simulated upgrades (postUpdate invocations)
    #[arg(long, default_value_t = 1)]
    upgrades: usize,

    /// Log format, overriding the configuration
    #[arg(short, long, value_enum)]
    format: Option<LogFormat>,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// What the dry run prints.
#[derive(Debug, Serialize)]
struct DryRunReport {
    run_id: String,
    hooks_fired: Vec<HookPoint>,
    init_params: Vec<serde_json::Value>,
    calls: Vec<RecordedCall>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref(), &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(format) = cli.format {
        config.logging.format = match format {
            LogFormat::Json => "json".to_string(),
            LogFormat::Pretty => "pretty".to_string(),
        };
    }

    init_logging(&config.logging);

    match run(config, cli.accounts, cli.upgrades).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to render report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("Dry run failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Fires every hook in host order and collects the report.
async fn run(
    config: AppConfig,
    accounts: usize,
    upgrades: usize,
) -> Result<DryRunReport, AppError> {
    tracing::info!("Starting dephook dry run v{}", env!("CARGO_PKG_VERSION"));

    let chain = MockChain::new()
        .with_accounts(accounts)
        .with_now(Utc::now());
    let env = chain.env();

    let registry = Arc::new(HookRegistry::new());
    TokenDaoHooks::new(config.scenario)?
        .register(&registry)
        .await?;
    let dispatcher = HookDispatcher::new(registry);

    let log_only = HookParams::new().with_log(chain.host_log());
    dispatcher.dispatch(HookPoint::PreDao, &log_only, &env).await?;

    let params = log_only
        .with_dao(chain.dao_address())
        .with_installer(chain.installer())
        .with_proxy(chain.proxy());
    dispatcher.dispatch(HookPoint::PostDao, &params, &env).await?;
    dispatcher.dispatch(HookPoint::PreInit, &params, &env).await?;
    let init_params = dispatcher.init_params(&params, &env).await?;
    dispatcher.dispatch(HookPoint::PostInit, &params, &env).await?;

    for upgrade in 0..upgrades {
        if upgrade > 0 {
            chain.set_now(chain.now() + Duration::days(1));
        }
        dispatcher.dispatch(HookPoint::PostUpdate, &params, &env).await?;
    }

    tracing::info!(
        run_id = %dispatcher.run_id(),
        calls = chain.calls().len(),
        "Dry run complete"
    );

    Ok(DryRunReport {
        run_id: dispatcher.run_id().to_string(),
        hooks_fired: dispatcher.fired(),
        init_params,
        calls: chain.calls(),
    })
}
